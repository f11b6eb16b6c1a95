//! Keystroke scripts.
//!
//! Plain characters are typed as-is. Named keys are written in angle
//! brackets: `<space>`, `<enter>`, `<bs>`, `<left>`, `<right>`, `<home>`,
//! `<end>`. A literal space or newline types that key; anything else in
//! brackets is typed literally.

use mazimo_editor_core::Key;

fn named_key(name: &str) -> Option<Key> {
    let key = match name {
        "space" => Key::Space,
        "enter" => Key::Enter,
        "bs" | "backspace" => Key::Backspace,
        "left" => Key::ArrowLeft,
        "right" => Key::ArrowRight,
        "home" => Key::Home,
        "end" => Key::End,
        _ => return None,
    };
    Some(key)
}

pub fn parse_script(script: &str) -> Vec<Key> {
    let mut keys = Vec::new();
    let mut rest = script;
    while let Some(ch) = rest.chars().next() {
        if ch == '<' {
            if let Some(close) = rest.find('>') {
                if let Some(key) = named_key(&rest[1..close]) {
                    keys.push(key);
                    rest = &rest[close + 1..];
                    continue;
                }
            }
        }
        keys.push(Key::from_char(ch));
        rest = &rest[ch.len_utf8()..];
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_characters() {
        assert_eq!(
            parse_script("a b\n"),
            [
                Key::character("a"),
                Key::Space,
                Key::character("b"),
                Key::Enter
            ]
        );
    }

    #[test]
    fn test_named_keys() {
        assert_eq!(
            parse_script("#<space>x<bs><home><end><left><right><enter>"),
            [
                Key::character("#"),
                Key::Space,
                Key::character("x"),
                Key::Backspace,
                Key::Home,
                Key::End,
                Key::ArrowLeft,
                Key::ArrowRight,
                Key::Enter,
            ]
        );
    }

    #[test]
    fn test_unknown_escape_is_literal() {
        let keys = parse_script("<b>é");
        let typed: String = keys
            .iter()
            .map(|k| match k {
                Key::Character(s) => s.to_string(),
                other => format!("{other:?}"),
            })
            .collect();
        assert_eq!(typed, "<b>é");
        assert_eq!(parse_script("<"), [Key::character("<")]);
    }
}
