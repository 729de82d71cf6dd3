#[macro_use]
mod common;

#[cfg(test)]
mod regression {
    tests! {
        class_can_reference_itself_in_method is OK
        "class Foo {\n  identity() {\n    return Foo;\n  }\n}\nprint Foo().identity();",
        "Foo"
    }

    tests! {
        function_retains_name_across_reassignment is OK
        "fun f() {}\nvar g = f;\nprint g;",
        "<fn f>"
    }
}
