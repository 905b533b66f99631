//! A deliberately small CSS selector subset.
//!
//! Supports what the hint pipeline's clickability sets need: selector lists
//! (`a, button, [onclick]`), tag names, `*`, class tests (`.btn`), and
//! attribute tests (`[onclick]`, `[contenteditable=true]`, quoted values
//! allowed). Anything unparsable matches nothing — a bad caller selector
//! drops candidates, it never errors.

/// One compound selector: optional tag plus class/attribute tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compound {
	/// Tag name to require, lowercase; `None` means any tag (`*` or bare tests).
	pub tag: Option<String>,
	/// Required class names.
	pub classes: Vec<String>,
	/// Attribute tests: name and, optionally, an exact expected value.
	pub attrs: Vec<(String, Option<String>)>,
}

impl Compound {
	/// Tests a compound against one element, reading attributes on demand.
	pub fn matches<'a>(&self, tag: &str, mut attr: impl FnMut(&str) -> Option<&'a str>) -> bool {
		if let Some(required) = &self.tag
			&& !required.eq_ignore_ascii_case(tag)
		{
			return false;
		}
		for class in &self.classes {
			let has = attr("class").is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class));
			if !has {
				return false;
			}
		}
		for (name, expected) in &self.attrs {
			match (attr(name), expected) {
				(None, _) => return false,
				(Some(_), None) => {}
				(Some(actual), Some(expected)) if actual == expected => {}
				_ => return false,
			}
		}
		true
	}
}

/// Parses a selector list, skipping compounds that use unsupported syntax.
pub fn parse_selector_list(selector: &str) -> Vec<Compound> {
	selector.split(',').filter_map(|part| parse_compound(part.trim())).collect()
}

/// Tests an element against a whole selector list.
pub fn list_matches<'a>(compounds: &[Compound], tag: &str, mut attr: impl FnMut(&str) -> Option<&'a str>) -> bool {
	compounds.iter().any(|c| c.matches(tag, &mut attr))
}

fn parse_compound(part: &str) -> Option<Compound> {
	if part.is_empty() {
		return None;
	}

	let mut compound = Compound::default();
	let mut rest = part;

	// Leading tag or `*`.
	if let Some(stripped) = rest.strip_prefix('*') {
		rest = stripped;
	} else {
		let end = rest.find(['.', '[']).unwrap_or(rest.len());
		if end > 0 {
			let tag = &rest[..end];
			if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
				return None;
			}
			compound.tag = Some(tag.to_ascii_lowercase());
			rest = &rest[end..];
		}
	}

	while !rest.is_empty() {
		if let Some(stripped) = rest.strip_prefix('.') {
			let end = stripped.find(['.', '[']).unwrap_or(stripped.len());
			if end == 0 {
				return None;
			}
			compound.classes.push(stripped[..end].to_string());
			rest = &stripped[end..];
		} else if let Some(stripped) = rest.strip_prefix('[') {
			let end = stripped.find(']')?;
			let test = &stripped[..end];
			match test.split_once('=') {
				Some((name, value)) => {
					let value = value.trim_matches(['"', '\'']);
					compound.attrs.push((name.trim().to_string(), Some(value.to_string())));
				}
				None => compound.attrs.push((test.trim().to_string(), None)),
			}
			rest = &stripped[end + 1..];
		} else {
			// Unsupported syntax (combinators, pseudo-classes).
			return None;
		}
	}

	Some(compound)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn attrs<'a>(pairs: &'a [(&str, &str)]) -> impl FnMut(&str) -> Option<&'a str> {
		move |name| pairs.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
	}

	#[test]
	fn tag_selector() {
		let list = parse_selector_list("a, button");
		assert!(list_matches(&list, "a", attrs(&[])));
		assert!(list_matches(&list, "button", attrs(&[])));
		assert!(!list_matches(&list, "div", attrs(&[])));
	}

	#[test]
	fn attribute_tests() {
		let list = parse_selector_list("*[onclick], *[role=button]");
		assert!(list_matches(&list, "div", attrs(&[("onclick", "go()")])));
		assert!(list_matches(&list, "span", attrs(&[("role", "button")])));
		assert!(!list_matches(&list, "span", attrs(&[("role", "tab")])));
		assert!(!list_matches(&list, "span", attrs(&[])));
	}

	#[test]
	fn quoted_attribute_values_and_classes() {
		let list = parse_selector_list("input[type=\"checkbox\"], .fancy-button");
		assert!(list_matches(&list, "input", attrs(&[("type", "checkbox")])));
		assert!(list_matches(&list, "div", attrs(&[("class", "big fancy-button")])));
		assert!(!list_matches(&list, "div", attrs(&[("class", "fancy")])));
	}

	#[test]
	fn unsupported_syntax_matches_nothing() {
		let list = parse_selector_list("div > span");
		assert!(!list_matches(&list, "div", attrs(&[])));
		assert!(!list_matches(&list, "span", attrs(&[])));

		// A bad compound does not poison the rest of the list.
		let list = parse_selector_list("div > span, a");
		assert!(list_matches(&list, "a", attrs(&[])));
	}
}
