//! Parser für die Konfigurations-Datei
//!
//! Zeilenbasiertes Key-Value Format, ein Parameter pro Zeile:
//!
//! ```text
//! # Kommentar
//! led_pin = 2
//! mqtt_host = "192.168.1.10"   // Kommentar hinter dem Wert
//! #define CONFIG_INVERT_LED_LOGIC false
//! ```
//!
//! Neben `KEY = VALUE` werden auch `#define CONFIG_KEY VALUE` Zeilen
//! verstanden, damit alte `config.h` Dateien direkt geladen werden können.
//! Kommentare: `//`, `#`, `;` und `/* ... */`. Block-Kommentare dürfen über
//! mehrere Zeilen gehen, auch wenn sie hinter einem Wert beginnen.
//!
//! Der Parser kopiert nichts: String-Werte zeigen in den Quelltext.
//! Escape-Sequenzen gibt es nicht, ein String endet am nächsten `"`.

use core::str::Lines;

use crate::error::{ParseError, ParseErrorKind};
use crate::types::{Key, Value};

/// Eine gültige Zeile der Konfigurations-Datei
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry<'a> {
    /// Zeilennummer (1-basiert)
    pub line: usize,
    pub key: Key,
    pub value: Value<'a>,
}

/// Iteriert über alle Einträge einer Konfigurations-Datei
///
/// ```
/// # use whitelight_core::{Key, Value, parser};
/// let mut entries = parser::entries("mqtt_port = 1883 // default\n");
/// let entry = entries.next().unwrap().unwrap();
/// assert_eq!(entry.key, Key::MqttPort);
/// assert_eq!(entry.value, Value::Int(1883));
/// assert!(entries.next().is_none());
/// ```
pub fn entries(source: &str) -> Entries<'_> {
    Entries {
        lines: source.lines(),
        line: 0,
        in_comment: false,
    }
}

/// Iterator aus [`entries`]
pub struct Entries<'a> {
    lines: Lines<'a>,
    line: usize,
    in_comment: bool,
}

impl<'a> Iterator for Entries<'a> {
    type Item = Result<Entry<'a>, ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let Some(raw) = self.lines.next() else {
                if self.in_comment {
                    self.in_comment = false;
                    return Some(Err(ParseError {
                        line: self.line,
                        kind: ParseErrorKind::UnterminatedComment,
                    }));
                }
                return None;
            };
            self.line += 1;

            let Some(text) = self.skip_block_comments(raw) else {
                continue;
            };

            match parse_line(text) {
                Ok(None) => continue,
                Ok(Some(parsed)) => {
                    self.in_comment = parsed.opens_comment;
                    let Parsed { key, value, .. } = parsed;
                    return Some(Ok(Entry {
                        line: self.line,
                        key,
                        value,
                    }));
                }
                Err(kind) => {
                    return Some(Err(ParseError {
                        line: self.line,
                        kind,
                    }));
                }
            }
        }
    }
}

impl<'a> Entries<'a> {
    /// Entfernt `/* ... */` am Zeilenanfang
    ///
    /// `None` wenn die ganze Zeile in einem Block-Kommentar liegt.
    fn skip_block_comments(&mut self, raw: &'a str) -> Option<&'a str> {
        let mut text = raw.trim_start();

        if self.in_comment {
            let end = text.find("*/")?;
            self.in_comment = false;
            text = text[end + 2..].trim_start();
        }

        while let Some(rest) = text.strip_prefix("/*") {
            match rest.find("*/") {
                Some(end) => text = rest[end + 2..].trim_start(),
                None => {
                    self.in_comment = true;
                    return None;
                }
            }
        }

        Some(text)
    }
}

/// Ergebnis einer Zeile mit Eintrag
struct Parsed<'a> {
    key: Key,
    value: Value<'a>,
    /// Hinter dem Wert beginnt ein `/*`, das erst in einer späteren Zeile endet
    opens_comment: bool,
}

/// Parst eine einzelne Zeile
///
/// `Ok(None)` für Leerzeilen und Kommentare.
fn parse_line(text: &str) -> Result<Option<Parsed<'_>>, ParseErrorKind> {
    let text = text.trim();
    if text.is_empty() || (is_comment(text) && !text.starts_with("#define")) {
        return Ok(None);
    }

    let (name, rest) = match text.strip_prefix("#define") {
        Some(rest) => {
            if !rest.starts_with(char::is_whitespace) {
                return Err(ParseErrorKind::MalformedLine);
            }
            let rest = rest.trim_start();
            let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            (&rest[..end], &rest[end..])
        }
        None => {
            let (name, rest) = text
                .split_once('=')
                .ok_or(ParseErrorKind::MalformedLine)?;
            (name.trim(), rest)
        }
    };

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(ParseErrorKind::MalformedLine);
    }

    let key = Key::from_name(name).ok_or(ParseErrorKind::UnknownKey)?;
    let (value, opens_comment) = parse_value(rest)?;
    Ok(Some(Parsed {
        key,
        value,
        opens_comment,
    }))
}

/// Parst den Wert-Teil einer Zeile inklusive optionalem Kommentar dahinter
///
/// Der bool ist `true`, wenn der Kommentar ein offener Block-Kommentar ist.
fn parse_value(rest: &str) -> Result<(Value<'_>, bool), ParseErrorKind> {
    let rest = rest.trim();
    if rest.is_empty() || is_comment(rest) {
        return Err(ParseErrorKind::MissingValue);
    }

    let (value, tail) = match rest.strip_prefix('"') {
        Some(body) => {
            let end = body.find('"').ok_or(ParseErrorKind::UnterminatedString)?;
            (Value::Str(&body[..end]), &body[end + 1..])
        }
        None => {
            let end = rest
                .find(|c: char| c.is_whitespace() || matches!(c, '/' | '#' | ';'))
                .unwrap_or(rest.len());
            (parse_literal(&rest[..end])?, &rest[end..])
        }
    };

    Ok((value, trailing_comment(tail)?))
}

/// Prüft den Rest hinter einem Wert
///
/// Erlaubt sind nur Kommentare. `Ok(true)` wenn ein `/*` in dieser Zeile
/// nicht mehr geschlossen wird.
fn trailing_comment(tail: &str) -> Result<bool, ParseErrorKind> {
    let mut tail = tail.trim();
    while let Some(rest) = tail.strip_prefix("/*") {
        match rest.find("*/") {
            Some(end) => tail = rest[end + 2..].trim_start(),
            None => return Ok(true),
        }
    }

    if tail.is_empty() || is_comment(tail) {
        Ok(false)
    } else {
        Err(ParseErrorKind::TrailingCharacters)
    }
}

/// Parst ein nacktes Literal: Integer oder `true`/`false`
///
/// ```
/// # use whitelight_core::{Value, parser::parse_literal};
/// assert_eq!(parse_literal("-1"), Ok(Value::Int(-1)));
/// assert_eq!(parse_literal("false"), Ok(Value::Bool(false)));
/// assert!(parse_literal("ON").is_err());
/// ```
pub fn parse_literal(token: &str) -> Result<Value<'static>, ParseErrorKind> {
    if token.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if token.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else {
        token
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| ParseErrorKind::InvalidLiteral)
    }
}

fn is_comment(text: &str) -> bool {
    text.starts_with("//") || text.starts_with("/*") || text.starts_with('#') || text.starts_with(';')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(source: &str) -> Result<Entry<'_>, ParseError> {
        let mut iter = entries(source);
        let entry = iter.next().expect("expected one entry");
        assert!(iter.next().is_none());
        entry
    }

    #[test]
    fn test_key_value_line() {
        let entry = single("led_pin = 2").unwrap();
        assert_eq!(entry.key, Key::LedPin);
        assert_eq!(entry.value, Value::Int(2));
        assert_eq!(entry.line, 1);
    }

    #[test]
    fn test_define_line_with_trailing_comment() {
        let entry = single("#define CONFIG_MQTT_PORT 1883 // Usually 1883").unwrap();
        assert_eq!(entry.key, Key::MqttPort);
        assert_eq!(entry.value, Value::Int(1883));
    }

    #[test]
    fn test_quoted_string_keeps_comment_chars() {
        let entry = single("wifi_password = \"a#b//c;d\" # secret").unwrap();
        assert_eq!(entry.value, Value::Str("a#b//c;d"));
    }

    #[test]
    fn test_comments_and_blank_lines_are_skipped() {
        let source = "\n// pins\n# comment\n; other\n\nled_pin = 4\n";
        let entry = single(source).unwrap();
        assert_eq!(entry.line, 6);
    }

    #[test]
    fn test_block_comment_spanning_lines() {
        let source = "/*\n * header\n */\n#define CONFIG_DEBUG true\n";
        let entry = single(source).unwrap();
        assert_eq!(entry.key, Key::DebugEnabled);
        assert_eq!(entry.value, Value::Bool(true));
        assert_eq!(entry.line, 4);
    }

    #[test]
    fn test_block_comment_before_value_on_same_line() {
        let entry = single("/* pin */ led_pin = 5").unwrap();
        assert_eq!(entry.value, Value::Int(5));
    }

    #[test]
    fn test_unterminated_block_comment() {
        let mut iter = entries("led_pin = 2\n/* open\n");
        assert!(iter.next().unwrap().is_ok());
        assert_eq!(
            iter.next().unwrap(),
            Err(ParseError {
                line: 2,
                kind: ParseErrorKind::UnterminatedComment
            })
        );
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_errors_carry_line_numbers() {
        let mut iter = entries("led_pin = 2\nmqtt_host = \"broker\nfoo = 1\n");
        assert!(iter.next().unwrap().is_ok());
        assert_eq!(
            iter.next().unwrap(),
            Err(ParseError {
                line: 2,
                kind: ParseErrorKind::UnterminatedString
            })
        );
        assert_eq!(
            iter.next().unwrap(),
            Err(ParseError {
                line: 3,
                kind: ParseErrorKind::UnknownKey
            })
        );
    }

    #[test]
    fn test_malformed_lines() {
        assert_eq!(
            single("led_pin 2").unwrap_err().kind,
            ParseErrorKind::MalformedLine
        );
        assert_eq!(
            single("#defineCONFIG_DEBUG true").unwrap_err().kind,
            ParseErrorKind::MalformedLine
        );
        assert_eq!(
            single("led pin = 2").unwrap_err().kind,
            ParseErrorKind::MalformedLine
        );
    }

    #[test]
    fn test_missing_and_trailing_values() {
        assert_eq!(
            single("led_pin =").unwrap_err().kind,
            ParseErrorKind::MissingValue
        );
        assert_eq!(
            single("#define CONFIG_PIN_WHITE // none").unwrap_err().kind,
            ParseErrorKind::MissingValue
        );
        assert_eq!(
            single("led_pin = 2 3").unwrap_err().kind,
            ParseErrorKind::TrailingCharacters
        );
        assert_eq!(
            single("mqtt_host = \"a\" b").unwrap_err().kind,
            ParseErrorKind::TrailingCharacters
        );
    }

    #[test]
    fn test_invalid_literal() {
        assert_eq!(
            single("mqtt_port = 18x3").unwrap_err().kind,
            ParseErrorKind::InvalidLiteral
        );
        assert_eq!(
            single("mqtt_host = broker").unwrap_err().kind,
            ParseErrorKind::InvalidLiteral
        );
    }

    #[test]
    fn test_block_comment_after_value_spans_lines() {
        let source = "#define CONFIG_PIN_WHITE 2 /* LED-Streifen,\n   GPIO2 am D1 mini */\nmqtt_port = 1884\n";
        let mut iter = entries(source);

        let entry = iter.next().unwrap().unwrap();
        assert_eq!((entry.line, entry.key, entry.value), (1, Key::LedPin, Value::Int(2)));

        let entry = iter.next().unwrap().unwrap();
        assert_eq!((entry.line, entry.key, entry.value), (3, Key::MqttPort, Value::Int(1884)));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_block_comment_after_value_hides_following_entries() {
        let source = "led_pin = 2 /* alt:\nled_pin = 4\n*/\n";
        let mut iter = entries(source);
        assert_eq!(iter.next().unwrap().unwrap().value, Value::Int(2));
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_block_comment_after_value_unterminated() {
        let mut iter = entries("mqtt_host = \"broker\" /* offen\n");
        assert!(iter.next().unwrap().is_ok());
        assert_eq!(
            iter.next().unwrap(),
            Err(ParseError {
                line: 1,
                kind: ParseErrorKind::UnterminatedComment
            })
        );
        assert!(iter.next().is_none());
    }

    #[test]
    fn test_closed_block_comment_after_value() {
        let entry = single("led_pin = 2 /* a */ // b").unwrap();
        assert_eq!(entry.value, Value::Int(2));
        assert_eq!(
            single("led_pin = 2 /* a */ 3").unwrap_err().kind,
            ParseErrorKind::TrailingCharacters
        );
    }
}
