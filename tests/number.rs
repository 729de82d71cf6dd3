#[macro_use]
mod common;

#[cfg(test)]
mod number {
    tests! {
        // A `.` not followed by a digit is not part of the number: it scans
        // as its own `DOT` token, so `123.` at end of input is a property
        // access with a missing name, not a lexical error.
        decimal_point_at_eof is ERR
        "print 123.",
        "[1:1] Error at end: Expect property name after '.'."
    }

    tests! {
        leading_dot is CASE
        common::parse_err_case("print 123;\n", ".456;", ".", "Expect expression.")
    }

    tests! {
        literals is OK
        "print 123;\nprint 987654;\nprint 0;\nprint -0;\nprint 123.456;\nprint -0.001;",
        "123", "987654", "0", "-0", "123.456", "-0.001"
    }

    tests! {
        nan_equality is OK
        "var nan = 0/0;\nprint nan == nan;\nprint nan != nan;\nprint 0/0 == 0/0;\nprint 0/0 != 0/0;",
        "false", "true", "false", "true"
    }

    tests! {
        // Likewise, `123.;` scans as `NUMBER(123) DOT SEMICOLON`; the parser
        // rejects it for lacking a property name after the dot.
        trailing_dot is CASE
        common::parse_err_case("print 123;\n123.", ";\nprint \"after\";", ";", "Expect property name after '.'.")
    }
}
