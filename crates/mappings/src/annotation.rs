/// Help text for a binding, with its optional feature-group tag.
///
/// Raw annotation strings may start with `#<digits>` naming the feature
/// group the binding belongs to (`"#3Open a link"`). The prefix is parsed
/// out at registration time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Annotation {
	/// The annotation text with any group prefix removed.
	pub text: String,
	/// Feature group parsed from the leading `#<digits>` prefix.
	pub feature_group: Option<u32>,
}

impl Annotation {
	/// Parses a raw annotation string.
	///
	/// A malformed prefix (`#` with no digits) is not an error: the string
	/// is kept verbatim with no group.
	pub fn parse(raw: &str) -> Annotation {
		let Some(rest) = raw.strip_prefix('#') else {
			return Annotation {
				text: raw.to_string(),
				feature_group: None,
			};
		};

		let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
		match digits.parse::<u32>() {
			Ok(group) => Annotation {
				text: rest[digits.len()..].to_string(),
				feature_group: Some(group),
			},
			Err(_) => Annotation {
				text: raw.to_string(),
				feature_group: None,
			},
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_feature_group_prefix() {
		let a = Annotation::parse("#3Open a link");
		assert_eq!(a.feature_group, Some(3));
		assert_eq!(a.text, "Open a link");
	}

	#[test]
	fn multi_digit_group() {
		let a = Annotation::parse("#12Scroll down");
		assert_eq!(a.feature_group, Some(12));
		assert_eq!(a.text, "Scroll down");
	}

	#[test]
	fn plain_annotation_has_no_group() {
		let a = Annotation::parse("Scroll down");
		assert_eq!(a.feature_group, None);
		assert_eq!(a.text, "Scroll down");
	}

	#[test]
	fn malformed_prefix_is_kept_verbatim() {
		let a = Annotation::parse("#not-a-group");
		assert_eq!(a.feature_group, None);
		assert_eq!(a.text, "#not-a-group");
	}

	#[test]
	fn large_groups_parse_without_leaking_the_prefix() {
		let a = Annotation::parse("#999Obscure feature");
		assert_eq!(a.feature_group, Some(999));
		assert_eq!(a.text, "Obscure feature");
	}
}
