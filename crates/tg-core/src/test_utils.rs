/// Default tolerance for floating-point comparisons
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Assert that two floating-point numbers are approximately equal
pub fn assert_approx_eq(actual: f64, expected: f64, tolerance: f64) {
  assert!(
    (actual - expected).abs() < tolerance,
    "Values not approximately equal:\n  actual:   {}\n  expected: {}\n  diff:     {}\n  tolerance: {}",
    actual,
    expected,
    (actual - expected).abs(),
    tolerance
  );
}

/// Percentages are rounded to at most 4 places before they reach callers
pub fn assert_percentage_eq(actual: f64, expected: f64) {
  assert_approx_eq(actual, expected, 1e-6);
}

/// Scores and health values are rounded to one decimal place
pub fn assert_score_eq(actual: f64, expected: f64) {
  assert_approx_eq(actual, expected, 1e-9);
}
