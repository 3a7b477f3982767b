/// Longest shortcode we try to resolve
const MAX_SHORTCODE_LEN: usize = 32;

/// Replace `:shortcode:` sequences with the emoji they name.
///
/// Unknown shortcodes and stray colons are kept as typed.
pub fn parse_emoji_shortcodes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(start) = rest.find(':') {
        result.push_str(&rest[..start]);
        let after_colon = &rest[start + 1..];

        let emoji = after_colon.find(':').and_then(|end| {
            let code = &after_colon[..end];
            let plausible = !code.is_empty()
                && code.len() <= MAX_SHORTCODE_LEN
                && !code.chars().any(char::is_whitespace);
            if plausible {
                emojis::get_by_shortcode(code).map(|emoji| (emoji, end))
            } else {
                None
            }
        });

        match emoji {
            Some((emoji, end)) => {
                result.push_str(emoji.as_str());
                rest = &after_colon[end + 1..];
            }
            None => {
                result.push(':');
                rest = after_colon;
            }
        }
    }

    result.push_str(rest);
    result
}
