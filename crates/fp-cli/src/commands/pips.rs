//! `fp pips`: print one pip row for a value/max pair.

use fp_module::FriendPoints;

/// Render the row to stdout.
pub fn run(value: u8, max: u8) -> Result<(), String> {
    if max == 0 {
        return Err("max must be at least 1".into());
    }
    if value > max {
        return Err(format!("value {value} exceeds max {max}"));
    }
    println!("  {}", super::pip_row(FriendPoints { value, max }));
    Ok(())
}
