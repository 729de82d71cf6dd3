#[macro_use]
mod common;

#[cfg(test)]
mod array {
    tests! {
        declaration_defaults_to_nil is OK
        "var xs[3];\nprint xs[0];\nprint xs[1];\nprint xs[2];",
        "nil", "nil", "nil"
    }

    tests! {
        declaration_with_initializer_fills_every_slot is OK
        "var xs[3] = 7;\nprint xs[0];\nprint xs[1];\nprint xs[2];",
        "7", "7", "7"
    }

    tests! {
        initializer_is_evaluated_once_per_declaration is OK
        "var n = 0;\nfun next() { n = n + 1; return n; }\nvar xs[3] = next();\nprint xs[0];\nprint xs[1];\nprint xs[2];",
        "1", "1", "1"
    }

    tests! {
        // A declared length of exactly 0 stores the plain initializer value
        // rather than a zero-element array.
        zero_length_stores_plain_value is OK
        "var xs[0] = \"solo\";\nprint xs;",
        "solo"
    }

    tests! {
        index_write_then_read is OK
        "var xs[2];\nxs[0] = \"a\";\nxs[1] = \"b\";\nprint xs[0];\nprint xs[1];",
        "a", "b"
    }

    tests! {
        index_expression_may_be_computed is OK
        "var xs[3] = 0;\nvar i = 1;\nxs[i] = 9;\nprint xs[1];",
        "9"
    }

    tests! {
        out_of_bounds_read is CASE
        common::runtime_err_case("var xs[2];\nprint xs[2];", "var xs[2];\nprint xs")
    }

    tests! {
        out_of_bounds_write is CASE
        common::runtime_err_case("var xs[2];\nxs[5] = 1;", "var xs[2];\nxs")
    }

    tests! {
        negative_index is CASE
        common::runtime_err_case("var xs[2];\nprint xs[-1];", "var xs[2];\nprint xs")
    }

    tests! {
        non_integer_index is CASE
        common::runtime_err_case("var xs[2];\nprint xs[0.5];", "var xs[2];\nprint xs")
    }

    tests! {
        non_number_index is CASE
        common::runtime_err_case("var xs[2];\nprint xs[\"0\"];", "var xs[2];\nprint xs")
    }

    tests! {
        indexing_a_non_array is CASE
        common::runtime_err_case("var x = 1;\nprint x[0];", "var x = 1;\nprint x")
    }

    tests! {
        negative_length is CASE
        common::runtime_err_case("var xs[-1];", "var xs")
    }

    tests! {
        non_integer_length is CASE
        common::runtime_err_case("var xs[1.5];", "var xs")
    }
}
