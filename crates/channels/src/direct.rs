/// Whether an acceptor on `channel_id` can have a fresh direct conversation
/// opened on demand.
///
/// `excluded` lists channel kinds that cannot (test emulators, some social
/// messaging channels). Entries are trimmed and compared case-insensitively.
pub fn supports_direct_conversation(channel_id: &str, excluded: &[String]) -> bool {
    let channel = channel_id.trim();
    !excluded
        .iter()
        .any(|kind| kind.trim().eq_ignore_ascii_case(channel))
}

#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    fn defaults() -> Vec<String> {
        vec!["emulator".into(), "facebook".into(), "skype".into()]
    }

    #[rstest]
    #[case("emulator", false)]
    #[case("Emulator", false)]
    #[case("FACEBOOK", false)]
    #[case("skype", false)]
    #[case("msteams", true)]
    #[case("webchat", true)]
    #[case("slack", true)]
    fn default_exclusions(#[case] channel: &str, #[case] expected: bool) {
        assert_eq!(supports_direct_conversation(channel, &defaults()), expected);
    }

    #[test]
    fn empty_exclusion_list_allows_everything() {
        assert!(supports_direct_conversation("emulator", &[]));
    }

    #[test]
    fn extended_list_is_honoured() {
        let mut list = defaults();
        list.push(" Telegram ".into());
        assert!(!supports_direct_conversation("telegram", &list));
    }

    #[test]
    fn no_prefix_matching() {
        assert!(supports_direct_conversation("emulator-v2", &defaults()));
    }
}
