/// Format `numerator / denominator` as a whole percentage such as `"42%"`.
///
/// Rounds ties to the even percentage, and a zero denominator yields `"0%"`.
/// Integer arithmetic keeps the rounding exact for any count.
pub fn format_percentage(numerator: u64, denominator: u64) -> String {
    if denominator == 0 {
        return "0%".to_string();
    }

    let scaled = u128::from(numerator) * 100;
    let denominator = u128::from(denominator);
    let mut whole = scaled / denominator;
    let twice_remainder = (scaled % denominator) * 2;

    if twice_remainder > denominator || (twice_remainder == denominator && whole % 2 == 1) {
        whole += 1;
    }

    format!("{}%", whole)
}
