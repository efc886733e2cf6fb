//! Identifier case conventions and conversions.

/// Returns true for `Module_Action` names: two or more underscore-separated
/// segments, each starting with an uppercase letter and continuing with
/// letters (and digits when `allow_digits` is set).
///
/// Acronym segments such as `LED` or `UART` are single segments.
#[must_use]
pub fn is_module_action(name: &str, allow_digits: bool) -> bool {
    let mut segments = 0;
    for segment in name.split('_') {
        let mut chars = segment.chars();
        match chars.next() {
            Some(c) if c.is_ascii_uppercase() => {}
            _ => return false,
        }
        if !chars.all(|c| c.is_ascii_alphabetic() || (allow_digits && c.is_ascii_digit())) {
            return false;
        }
        segments += 1;
    }
    segments >= 2
}

/// Returns true for names made only of lowercase letters, digits and
/// underscores.
#[must_use]
pub fn is_lower_snake(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Returns true for `UPPER_SNAKE` names starting with a letter.
#[must_use]
pub fn is_upper_snake(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
}

/// Splits an identifier into words at underscores and case changes.
///
/// Runs of capitals stay together as one acronym word, so `LEDPin` splits
/// into `LED` and `Pin`. Digits stay attached to the preceding word.
#[must_use]
pub fn split_words(name: &str) -> Vec<String> {
    let chars: Vec<char> = name.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_ascii_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            let boundary = prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Converts to `lower_snake_case` (`ledPin` becomes `led_pin`).
#[must_use]
pub fn to_snake_case(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Converts to `UPPER_SNAKE_CASE` (`maxSpeed` becomes `MAX_SPEED`).
#[must_use]
pub fn to_upper_snake(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|w| w.to_ascii_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Uppercases the first letter of a word, leaving the rest as written.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_ascii_uppercase().to_string() + chars.as_str()
    })
}

fn is_acronym(word: &str) -> bool {
    word.len() >= 2 && word.chars().all(|c| c.is_ascii_uppercase())
}

/// Best-effort `Module_Action` form of a function name.
///
/// - `led_init` and `LED_init` become `Led_Init` and `LED_Init`
/// - an acronym word is taken as the module: `initLED` becomes `LED_Init`
///
/// Returns `None` when no module can be inferred from the name.
#[must_use]
pub fn to_module_action(name: &str) -> Option<String> {
    if name.contains('_') {
        let parts: Vec<String> = name
            .split('_')
            .filter(|p| !p.is_empty())
            .map(|p| if is_acronym(p) { p.to_string() } else { capitalize(p) })
            .collect();
        return (parts.len() >= 2).then(|| parts.join("_"));
    }

    let words = split_words(name);
    if words.len() < 2 {
        return None;
    }
    let module_index = words.iter().position(|w| is_acronym(w))?;
    let action: String = words
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != module_index)
        .map(|(_, w)| capitalize(&w.to_ascii_lowercase()))
        .collect();
    Some(format!("{}_{action}", words[module_index]))
}

/// `PascalCase` form of a name (`processData` becomes `ProcessData`).
#[must_use]
pub fn to_pascal_case(name: &str) -> String {
    split_words(name)
        .iter()
        .map(|w| {
            if is_acronym(w) {
                w.clone()
            } else {
                capitalize(&w.to_ascii_lowercase())
            }
        })
        .collect()
}
