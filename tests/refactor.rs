use hypofix::{RefactorError, refactor};
use insta::assert_snapshot;

fn refactor_twice(code: &str) -> String {
    let once = refactor(code).unwrap();
    let twice = refactor(&once).unwrap();
    assert_eq!(once, twice, "refactor is not idempotent");
    once
}

#[test]
fn test_upgrades_a_test_module() {
    let code = r#"import hypothesis
from hypothesis import given, strategies as st
from hypothesis.extra import numpy as npst


@given(st.lists(st.integers(), 1, 10), st.fractions(0, 1, 9))
def test_sum(xs, q):
    hypothesis.target(float(q), "q")
    assert npst.array_shapes(1, 3)


@given(st.complex_numbers(None, 10), st.floats(0, 1, False, False, 32))
def test_complex(z, x):
    pass
"#;
    assert_snapshot!(refactor_twice(code), @r#"
    import hypothesis
    from hypothesis import given, strategies as st
    from hypothesis.extra import numpy as npst


    @given(st.lists(st.integers(), min_size=1, max_size=10), st.fractions(0, 1, max_denominator=9))
    def test_sum(xs, q):
        hypothesis.target(float(q), label="q")
        assert npst.array_shapes(min_dims=1, max_dims=3)


    @given(st.complex_numbers(min_magnitude=0, max_magnitude=10), st.floats(0, 1, allow_nan=False, allow_infinity=False, width=32))
    def test_complex(z, x):
        pass
    "#);
}

#[test]
fn test_modern_code_is_unchanged() {
    let code = "from hypothesis import strategies as st\n\nst.binary(min_size=1)\nst.fractions(0, 1, max_denominator=9)\n";
    assert_eq!(refactor(code).unwrap(), code);
}

#[test]
fn test_fully_qualified_access() {
    let code = "import hypothesis.strategies\n\nhypothesis.strategies.binary(1, 2)\n";
    assert_snapshot!(refactor_twice(code), @r"
    import hypothesis.strategies

    hypothesis.strategies.binary(min_size=1, max_size=2)
    ");
}

#[test]
fn test_ambiguous_binding_is_unchanged() {
    let code = "\
from hypothesis.strategies import fractions


def fractions(*args):
    return args


fractions(0, 1, 9)
";
    assert_eq!(refactor(code).unwrap(), code);
}

#[test]
fn test_parameter_shadows_import() {
    let code = "\
from hypothesis import strategies as st


def build(st):
    return st.binary(1)
";
    assert_eq!(refactor(code).unwrap(), code);
}

#[test]
fn test_too_many_positional_arguments_is_unchanged() {
    let code = "from hypothesis import strategies as st\nst.sets(st.none(), 1, 2, 3)\n";
    assert_eq!(refactor(code).unwrap(), code);
}

#[test]
fn test_sentinel_keyword() {
    let code = "from hypothesis.strategies import complex_numbers\ncomplex_numbers(min_magnitude=None, max_magnitude=None)\n";
    assert_snapshot!(refactor_twice(code), @r"
    from hypothesis.strategies import complex_numbers
    complex_numbers(min_magnitude=0, max_magnitude=None)
    ");
}

#[test]
fn test_unrelated_functions_with_same_name() {
    let code = "from fractions import Fraction\n\ndef fractions(a, b, c):\n    return Fraction(a, b)\n\nfractions(0, 1, 9)\n";
    assert_eq!(refactor(code).unwrap(), code);
}

#[test]
fn test_comments_and_layout_survive() {
    let code = "\
from hypothesis import strategies as st

# keep me
x = st.text(
    st.characters(),  # alphabet
    0,
    10  # upper bound
)
";
    assert_snapshot!(refactor_twice(code), @r"
    from hypothesis import strategies as st

    # keep me
    x = st.text(
        st.characters(),  # alphabet
        min_size=0,
        max_size=10  # upper bound
    )
    ");
}

#[test]
fn test_invalid_source_is_rejected() {
    let err = refactor("from hypothesis import strategies as st\nst.binary(1,\n").unwrap_err();
    let RefactorError::Parse(parse) = err else {
        panic!("expected a parse error, got {err}");
    };
    assert!(parse.span.start <= parse.span.end);
}

#[test]
fn test_global_rebinding_is_ambiguous() {
    let code = "\
from hypothesis import strategies as st


def reset():
    global st
    st = object()


st.fractions(0, 1, 9)
";
    assert_eq!(refactor(code).unwrap(), code);
}

#[test]
fn test_match_capture_is_ambiguous() {
    let code = "\
from hypothesis.strategies import binary

match x:
    case binary:
        pass

binary(1)
";
    assert_eq!(refactor(code).unwrap(), code);
}

#[test]
fn test_ambiguous_sentinel_is_unchanged() {
    let code = "\
try:
    from hypothesis.strategies import complex_numbers
except ImportError:
    from other import complex_numbers

complex_numbers(min_magnitude=None)
";
    assert_eq!(refactor(code).unwrap(), code);
}

#[test]
fn test_splats_are_stable() {
    let code = "from hypothesis import strategies as st\nst.lists(x, 1, *r)\nst.binary(1, **kw)\n";
    assert_snapshot!(refactor_twice(code), @r"
    from hypothesis import strategies as st
    st.lists(x, min_size=1, *r)
    st.binary(min_size=1, **kw)
    ");
}

#[test]
fn test_full_arity_floats() {
    let code = "from hypothesis import strategies as st\nst.floats(0, 1, False, False, 32, True, True)\n";
    assert_snapshot!(refactor_twice(code), @r"
    from hypothesis import strategies as st
    st.floats(0, 1, allow_nan=False, allow_infinity=False, width=32, exclude_min=True, exclude_max=True)
    ");
}
