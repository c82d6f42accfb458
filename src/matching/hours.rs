/// Bring an hour from the 0–47 overnight space back to 0–23
pub fn normalize_display_hour(hour: u32) -> u32 {
    if hour >= 24 {
        hour - 24
    } else {
        hour
    }
}

/// Display label such as `"6H"` for a (possibly overnight) hour
pub fn format_hour_label(hour: u32) -> String {
    format!("{}H", normalize_display_hour(hour))
}

/// Label for the hour stored on an assignment: `"6"` becomes `"06H"`.
/// Text that is not a number is shown as-is.
pub fn format_assignment_hour(hour: &str) -> String {
    match hour.trim().parse::<u32>() {
        Ok(value) if value < 10 => format!("{:02}H", value),
        _ => format!("{}H", hour),
    }
}
