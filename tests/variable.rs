#[macro_use]
mod common;

#[cfg(test)]
mod variable {
    tests! {
        collide_with_parameter is CASE
        common::parse_err_case(
            "fun foo(a) {\n  var ",
            "a = \"value\";\n}",
            "a",
            "Already a variable with this name 'a' in this scope.",
        )
    }

    tests! {
        duplicate_local is CASE
        common::parse_err_case(
            "{\n  var a = \"value\";\n  var ",
            "a = \"other\";\n}",
            "a",
            "Already a variable with this name 'a' in this scope.",
        )
    }

    tests! {
        duplicate_parameter is CASE
        common::parse_err_case("fun foo(arg, ", "arg) {}", "arg", "Already a variable with this name 'arg' in this scope.")
    }

    tests! {
        early_bound is OK
        "var a = \"outer\";\n{\n  fun foo() {\n    print a;\n  }\n  foo();\n  var a = \"inner\";\n  foo();\n}",
        "outer", "outer"
    }

    tests! {
        in_middle_of_block is OK
        "{\n  var a = \"a\";\n  print a;\n\n  var b = a + \" b\";\n  print b;\n\n  var c = a + \" c\";\n  print c;\n\n  var d = b + \" d\";\n  print d;\n}",
        "a", "a b", "a c", "a b d"
    }

    tests! {
        in_nested_block is OK
        "{\n  var a = \"outer\";\n  {\n    print a;\n  }\n}",
        "outer"
    }

    tests! {
        local_from_method is OK
        "class Foo {\n  method() {\n    var variable = \"variable\";\n    print variable;\n  }\n}\nFoo().method();",
        "variable"
    }

    tests! {
        redeclare_global is OK
        "var a = \"1\";\nvar a;\nprint a;",
        "nil"
    }

    tests! {
        redefine_global is OK
        "var a = \"1\";\nvar a = \"2\";\nprint a;",
        "2"
    }

    tests! {
        scope_reuse_in_different_blocks is OK
        "{\n  var a = \"first\";\n  print a;\n}\n{\n  var a = \"second\";\n  print a;\n}",
        "first", "second"
    }

    tests! {
        shadow_and_local is OK
        "{\n  var a = \"outer\";\n  {\n    print a;\n    var a = \"inner\";\n    print a;\n  }\n}",
        "outer", "inner"
    }

    tests! {
        shadow_global is OK
        "var a = \"global\";\n{\n  var a = \"shadow\";\n  print a;\n}\nprint a;",
        "shadow", "global"
    }

    tests! {
        shadow_local is OK
        "{\n  var a = \"local\";\n  {\n    var a = \"shadow\";\n    print a;\n  }\n  print a;\n}",
        "shadow", "local"
    }

    tests! {
        undefined_global is CASE
        common::runtime_err_case("print notDefined;", "print notDefined")
    }

    tests! {
        undefined_local is CASE
        common::runtime_err_case("{\n  print notDefined;\n}", "{\n  print notDefined")
    }

    tests! {
        uninitialized is OK
        "var a;\nprint a;",
        "nil"
    }

    tests! {
        unreached_undefined is OK
        "if (false) {\n  print notDefined;\n}\nprint \"ok\";",
        "ok"
    }

    tests! {
        use_false_as_var is CASE
        common::parse_err_case("var ", "false = \"value\";", "false", "Expect variable name.")
    }

    tests! {
        use_global_in_initializer is OK
        "var a = \"value\";\nvar a = a;\nprint a;",
        "value"
    }

    tests! {
        use_local_in_initializer is CASE
        common::parse_err_case(
            "var a = \"outer\";\n{\n  var ",
            "a = a;\n}",
            "a",
            "Can't read local variable in its own initializer.",
        )
    }

    tests! {
        use_nil_as_var is CASE
        common::parse_err_case("var ", "nil = \"value\";", "nil", "Expect variable name.")
    }

    tests! {
        use_this_as_var is CASE
        common::parse_err_case("var ", "this = \"value\";", "this", "Expect variable name.")
    }
}
