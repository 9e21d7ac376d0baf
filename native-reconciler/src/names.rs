//! Name conversions between element props and native identifiers.

use crate::value::Name;

/// `fontSize` -> `font-size`, `onNotify:label` -> `on-notify:label`.
pub fn to_kebab_case(name: &str) -> Name {
    let mut out = Name::new();
    let mut prev: Option<char> = None;
    for ch in name.chars() {
        if ch == '_' || ch == ' ' {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
        } else if ch.is_uppercase() {
            if matches!(prev, Some(p) if p.is_lowercase() || p.is_ascii_digit()) {
                out.push('-');
            }
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
        prev = Some(ch);
    }
    out
}

/// `adw-application-window` -> `AdwApplicationWindow`.
pub fn to_pascal_case(name: &str) -> Name {
    let mut out = Name::new();
    for part in name.split(['-', '_']).filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(chars.as_str());
        }
    }
    out
}

/// Native class name an element tag resolves to.
pub fn class_name_for_tag(tag: &str) -> Name {
    to_pascal_case(tag)
}

/// Derive the signal a prop would subscribe to, without checking whether any
/// class actually emits it.
///
/// `onClicked` -> `clicked`, `onNotify:label` -> `notify::label`. Returns
/// `None` when the prop does not follow the `<prefix><Upper>` convention.
pub fn derive_signal_name(prop: &str, prefix: &str) -> Option<Name> {
    if prefix.is_empty() || !prop.starts_with(prefix) || prop.len() == prefix.len() {
        return None;
    }

    let kebab = to_kebab_case(prop).replace(':', "::");
    let head = format!("{}-", to_kebab_case(prefix));
    let signal = kebab.strip_prefix(head.as_str())?;
    if signal.is_empty() {
        return None;
    }
    Some(signal.into())
}

/// `notify::label` -> `notify`.
pub fn signal_base(signal: &str) -> &str {
    signal.split("::").next().unwrap_or(signal)
}
