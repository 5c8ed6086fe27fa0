use crust::change_set::ServiceCode;
use crust::markup::Tag;
use crust::prompts::*;

#[test]
fn test_language_is_substituted() {
    let prompts = PromptLibrary::new("pt-br").unwrap();

    for kind in [PromptKind::Security, PromptKind::Explain] {
        let prompt = prompts.render(kind).unwrap();
        assert!(prompt.contains("pt-br"), "{:?}", kind);
        assert!(!prompt.contains("{{"), "{:?}", kind);
    }
}

#[test]
fn test_blank_language_defaults_to_english() {
    let prompts = PromptLibrary::new("  ").unwrap();
    assert_eq!(prompts.language(), DEFAULT_LANGUAGE);
    assert!(prompts.render(PromptKind::Explain).unwrap().contains("English"));
}

#[test]
fn test_tagged_prompts_list_markup_tags() {
    let prompts = PromptLibrary::new("English").unwrap();

    for kind in [PromptKind::Security, PromptKind::Explain] {
        let prompt = prompts.render(kind).unwrap();
        assert!(prompt.contains(&Tag::advertised_list()), "{:?}", kind);
    }
}

#[test]
fn test_cost_prompt_lists_service_codes() {
    let prompt = PromptLibrary::new("English").unwrap().render(PromptKind::Cost).unwrap();

    for code in ServiceCode::ALL {
        assert!(prompt.contains(code.as_str()), "{}", code);
    }
}

#[test]
fn test_markup_is_not_html_escaped() {
    let prompt = PromptLibrary::new("English").unwrap().render(PromptKind::Security).unwrap();
    assert!(prompt.contains("<red>"));
    assert!(!prompt.contains("&lt;"));
}
