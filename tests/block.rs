#[macro_use]
mod common;

#[cfg(test)]
mod block {
    tests! {
        empty is OK
        "{\n  print \"ok\";\n}",
        "ok"
    }

    tests! {
        scope is OK
        "var a = \"outer\";\n{\n  var a = \"inner\";\n  print a;\n}\nprint a;",
        "inner", "outer"
    }
}
