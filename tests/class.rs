#[macro_use]
mod common;

#[cfg(test)]
mod class {
    tests! {
        empty is OK
        "class Foo {}\nprint Foo;",
        "Foo"
    }

    tests! {
        inherit_self is CASE
        common::parse_err_case("class Foo < ", "Foo {}", "Foo", "A class can't inherit from itself.")
    }

    tests! {
        inherited_method is OK
        "class Foo {\n  foo() { print \"foo\"; }\n}\nclass Bar < Foo {\n  bar() { print \"bar\"; }\n}\nclass Baz < Bar {\n  baz() { print \"baz\"; }\n}\nBaz().foo();\nBaz().bar();\nBaz().baz();",
        "foo", "bar", "baz"
    }

    tests! {
        local_inherit_other is OK
        "class A {}\n{\n  class B < A {}\n  print B;\n}",
        "B"
    }

    tests! {
        local_inherit_self is CASE
        common::parse_err_case("{\n  class Foo < ", "Foo {}\n}", "Foo", "A class can't inherit from itself.")
    }

    tests! {
        local_reference_self is OK
        "{\n  class Foo {\n    identity() { return Foo; }\n  }\n  print Foo;\n}",
        "Foo"
    }

    tests! {
        reference_self is OK
        "class Foo {\n  identity() { return Foo; }\n}\nprint Foo;",
        "Foo"
    }
}
