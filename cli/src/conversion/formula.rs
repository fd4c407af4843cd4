//! # UnitXchange Formula Formatting
//!
//! File: cli/src/conversion/formula.rs
//!
//! Builds the human-readable formula strings shown under a conversion. Results are
//! rounded to two decimal places and factors to four. The input value is echoed
//! the way the user typed it into a float field, so whole numbers keep one
//! decimal (`5.0`, not `5`).
//!

/// Formats an input value with at least one decimal place.
pub fn display_value(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// `{value} {from} × {factor:.4} = {result:.2} {to}`
pub fn linear_formula(from_unit: &str, to_unit: &str, value: f64, factor: f64, result: f64) -> String {
    format!(
        "{} {} × {:.4} = {:.2} {}",
        display_value(value),
        from_unit,
        factor,
        result,
        to_unit
    )
}

/// Temperature formulas reflect the affine transform instead of a factor.
pub fn temperature_formula(from_unit: &str, to_unit: &str, value: f64, result: f64) -> String {
    let value = display_value(value);
    match (from_unit, to_unit) {
        ("Celsius", "Fahrenheit") => format!("({}°C × 9/5) + 32 = {:.2}°F", value, result),
        ("Fahrenheit", "Celsius") => format!("({}°F - 32) × 5/9 = {:.2}°C", value, result),
        _ => format!("{}°{} = {:.2}°{}", value, from_unit, result, to_unit),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(5.0), "5.0");
        assert_eq!(display_value(2.25), "2.25");
        assert_eq!(display_value(0.0), "0.0");
        assert_eq!(display_value(-40.0), "-40.0");
    }

    #[test]
    fn test_linear_formula_rounding() {
        assert_eq!(
            linear_formula("Miles", "Kilometers", 3.0, 1.60934, 4.82802),
            "3.0 Miles × 1.6093 = 4.83 Kilometers"
        );
    }

    #[test]
    fn test_temperature_formulas() {
        assert_eq!(
            temperature_formula("Fahrenheit", "Celsius", 212.0, 100.0),
            "(212.0°F - 32) × 5/9 = 100.00°C"
        );
        assert_eq!(
            temperature_formula("Celsius", "Celsius", 21.5, 21.5),
            "21.5°Celsius = 21.50°Celsius"
        );
    }
}
