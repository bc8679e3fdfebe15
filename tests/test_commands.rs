//! Commands driven through an in-memory console.

mod helpers;

use helpers::{console, finish};
use quick_answers::cli::args::{CategoryCommand, Credentials, NoteCommand, ResponseCommand};
use quick_answers::cli::commands;
use quick_answers::domain::Language;
use quick_answers::util::testing::MockGateway;

fn signed_in() -> MockGateway {
    MockGateway::builder().with_user("user-1").build()
}

#[test]
fn given_signed_out_user_when_listing_categories_then_prints_login_notice() {
    // Arrange
    let mut gateway = MockGateway::builder().build();
    let mut console = console(true, false);

    // Act
    commands::categories(&mut gateway, CategoryCommand::List, &mut console).unwrap();

    // Assert
    let (out, _) = finish(console);
    assert!(out.contains("You are not signed in"));
    assert_eq!(gateway.call_count("list_categories"), 0);
}

#[test]
fn given_category_and_response_when_deleting_category_then_cascade_is_confirmed() {
    // Arrange
    let mut gateway = signed_in();

    // Act: create category
    let mut out = console(true, false);
    commands::categories(
        &mut gateway,
        CategoryCommand::Add {
            title: " Greetings ".to_string(),
            description: None,
        },
        &mut out,
    )
    .unwrap();
    assert_eq!(finish(out).0, "> Greetings (0)  [cat-1]\n");

    // Act: add response to the most recent category
    let mut out = console(true, false);
    commands::responses(
        &mut gateway,
        ResponseCommand::Add {
            category: None,
            text: "Hola".to_string(),
            language: None,
        },
        Language::Spanish,
        &mut out,
    )
    .unwrap();
    assert_eq!(finish(out).0, "Greetings\n\n🇪🇸 Spanish  [resp-2]\n    Hola\n");

    // Act: count is visible in the sidebar
    let mut out = console(true, false);
    commands::categories(&mut gateway, CategoryCommand::List, &mut out).unwrap();
    assert_eq!(finish(out).0, "> Greetings (1)  [cat-1]\n");

    // Act: delete after confirmation
    let mut out = console(true, false);
    commands::categories(
        &mut gateway,
        CategoryCommand::Delete {
            id: "cat-1".to_string(),
            yes: false,
        },
        &mut out,
    )
    .unwrap();

    // Assert
    let (text, asked) = finish(out);
    assert_eq!(
        asked,
        vec!["Delete category \"Greetings\"? This will also delete 1 response in this category. This action cannot be undone."]
    );
    assert!(text.starts_with("No categories yet"));
    assert!(gateway.categories().is_empty());
    assert!(gateway.responses().is_empty());
}

#[test]
fn given_declined_confirmation_when_deleting_then_nothing_is_removed() {
    // Arrange
    let mut gateway = MockGateway::builder()
        .with_user("user-1")
        .with_note("n1", "Keep me", &[])
        .build();
    let mut out = console(false, false);

    // Act
    commands::notes(
        &mut gateway,
        NoteCommand::Delete {
            id: "n1".to_string(),
            yes: false,
        },
        &mut out,
    )
    .unwrap();

    // Assert
    let (text, asked) = finish(out);
    assert_eq!(text, "Cancelled.\n");
    assert_eq!(asked.len(), 1);
    assert_eq!(gateway.notes().len(), 1);
    assert_eq!(gateway.call_count("delete_note"), 0);
}

#[test]
fn given_yes_flag_when_deleting_then_does_not_prompt() {
    // Arrange
    let mut gateway = MockGateway::builder()
        .with_user("user-1")
        .with_category("cat-1", "Greetings", "")
        .with_response("resp-1", "cat-1", "Hola", Language::Spanish)
        .build();
    let mut out = console(false, false);

    // Act
    commands::responses(
        &mut gateway,
        ResponseCommand::Delete {
            id: "resp-1".to_string(),
            yes: true,
        },
        Language::Spanish,
        &mut out,
    )
    .unwrap();

    // Assert
    let (text, asked) = finish(out);
    assert!(asked.is_empty());
    assert_eq!(text, "Greetings\n\nNo responses yet in this category.\n");
}

#[test]
fn given_tagged_notes_when_listing_with_filters_then_shows_matching_subset() {
    // Arrange
    let mut gateway = signed_in();
    for (text, tags) in [
        ("Remember to call back", vec!["VIP", "billing"]),
        ("Refund policy is 30 days", vec!["billing"]),
        ("remember the milk", vec![]),
    ] {
        let mut out = console(true, false);
        commands::notes(
            &mut gateway,
            NoteCommand::Add {
                text: text.to_string(),
                tags: tags.into_iter().map(String::from).collect(),
            },
            &mut out,
        )
        .unwrap();
    }
    let mut out = console(true, true);

    // Act
    commands::notes(
        &mut gateway,
        NoteCommand::List {
            tags: vec!["Billing".to_string()],
            search: Some("remember".to_string()),
        },
        &mut out,
    )
    .unwrap();

    // Assert
    let (text, _) = finish(out);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    let notes = json.as_array().unwrap();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0]["text"], "Remember to call back");
    assert_eq!(notes[0]["tags"], serde_json::json!(["vip", "billing"]));
}

#[test]
fn given_overlong_tag_when_adding_note_then_fails_before_insert() {
    // Arrange
    let mut gateway = signed_in();
    let mut out = console(true, false);

    // Act
    let result = commands::notes(
        &mut gateway,
        NoteCommand::Add {
            text: "Text".to_string(),
            tags: vec!["a".repeat(21)],
        },
        &mut out,
    );

    // Assert
    let err = result.unwrap_err();
    assert!(err.to_string().contains("longer than 20 characters"));
    assert_eq!(gateway.call_count("insert_note"), 0);
}

#[test]
fn given_note_edit_when_untagging_and_tagging_then_replaces_tags() {
    // Arrange
    let mut gateway = MockGateway::builder()
        .with_user("user-1")
        .with_note("n1", "Follow up", &["old", "keep"])
        .build();
    let mut out = console(true, false);

    // Act
    commands::notes(
        &mut gateway,
        NoteCommand::Edit {
            id: "n1".to_string(),
            text: None,
            tags: vec!["New".to_string(), "keep".to_string()],
            untag: vec!["OLD".to_string()],
        },
        &mut out,
    )
    .unwrap();

    // Assert
    assert_eq!(gateway.notes()[0].tags, vec!["keep", "new"]);
    assert!(gateway.notes()[0].updated_at.is_some());
}

#[test]
fn given_blank_title_when_adding_category_then_errors_without_backend_write() {
    // Arrange
    let mut gateway = signed_in();
    let mut out = console(true, false);

    // Act
    let result = commands::categories(
        &mut gateway,
        CategoryCommand::Add {
            title: "  ".to_string(),
            description: None,
        },
        &mut out,
    );

    // Assert
    assert_eq!(result.unwrap_err().to_string(), "Title is required");
    assert_eq!(gateway.call_count("insert_category"), 0);
}

#[test]
fn given_backend_rejection_when_saving_then_surfaces_raw_message() {
    // Arrange
    let mut gateway = MockGateway::builder()
        .with_user("user-1")
        .failing_on(
            "insert_category",
            quick_answers::domain::DomainError::Backend("duplicate key value".to_string()),
        )
        .build();
    let mut out = console(true, false);

    // Act
    let result = commands::categories(
        &mut gateway,
        CategoryCommand::Add {
            title: "Greetings".to_string(),
            description: None,
        },
        &mut out,
    );

    // Assert
    assert_eq!(result.unwrap_err().to_string(), "duplicate key value");
}

#[test]
fn given_no_password_flag_when_logging_in_then_prompts_and_returns_session() {
    // Arrange
    let mut gateway = MockGateway::builder()
        .with_account("ana@example.com", "secret")
        .build();
    let mut out = console(true, false);

    // Act
    let session = commands::login(
        &mut gateway,
        Credentials {
            email: "ana@example.com".to_string(),
            password: None,
        },
        &mut out,
    )
    .unwrap();

    // Assert
    let (text, asked) = finish(out);
    assert_eq!(asked, vec!["Password"]);
    assert_eq!(session.user.email.as_deref(), Some("ana@example.com"));
    assert!(text.starts_with("Signed in as ana@example.com"));
}

#[test]
fn given_new_account_when_signing_up_then_asks_to_check_email() {
    // Arrange
    let mut gateway = MockGateway::builder().build();
    let mut out = console(true, false);

    // Act
    commands::sign_up(
        &mut gateway,
        Credentials {
            email: "new@example.com".to_string(),
            password: Some("pw123456".to_string()),
        },
        &mut out,
    )
    .unwrap();

    // Assert
    let (text, asked) = finish(out);
    assert!(asked.is_empty());
    assert!(text.starts_with("Check your email."));
    assert!(text.contains("new@example.com"));
}

#[test]
fn given_signed_in_user_when_asking_whoami_then_prints_email_as_json() {
    // Arrange
    let mut gateway = signed_in();
    let mut out = console(true, true);

    // Act
    commands::whoami(&mut gateway, &mut out).unwrap();

    // Assert
    let (text, _) = finish(out);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["id"], "user-1");
    assert_eq!(json["email"], "user-1@example.com");
}

#[test]
fn given_blank_tag_filter_when_listing_notes_then_ignores_it() {
    // Arrange
    let mut gateway = MockGateway::builder()
        .with_user("user-1")
        .with_note("n1", "Tagged", &["vip"])
        .with_note("n2", "Untagged", &[])
        .build();
    let mut out = console(true, true);

    // Act
    commands::notes(
        &mut gateway,
        NoteCommand::List {
            tags: vec!["".to_string(), "   ".to_string()],
            search: None,
        },
        &mut out,
    )
    .unwrap();

    // Assert
    let (text, _) = finish(out);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[test]
fn given_raw_flag_when_showing_response_then_prints_only_its_text() {
    // Arrange
    let mut gateway = MockGateway::builder()
        .with_user("user-1")
        .with_category("cat-1", "Greetings", "")
        .with_response("r1", "cat-1", "Hola\nBuenos días", Language::Spanish)
        .build();
    let mut out = console(true, false);

    // Act
    commands::responses(
        &mut gateway,
        ResponseCommand::Show {
            id: "r1".to_string(),
            raw: true,
        },
        Language::Spanish,
        &mut out,
    )
    .unwrap();

    // Assert
    let (text, _) = finish(out);
    assert_eq!(text, "Hola\nBuenos días\n");
}

#[test]
fn given_note_id_when_showing_note_then_prints_full_text_tags_and_date() {
    let mut gateway = MockGateway::builder()
        .with_user("user-1")
        .with_note("n1", "Call back\nafter lunch", &["vip"])
        .build();
    let mut out = console(true, false);

    commands::notes(&mut gateway, NoteCommand::Show { id: "n1".to_string() }, &mut out).unwrap();

    let (text, _) = finish(out);
    assert_eq!(text, "[n1]\nCall back\nafter lunch\n#vip\nJan 1, 2024\n");
}

#[test]
fn given_unknown_note_id_when_showing_then_returns_not_found() {
    let mut gateway = signed_in();
    let mut out = console(true, false);

    let result = commands::notes(&mut gateway, NoteCommand::Show { id: "nope".to_string() }, &mut out);

    assert_eq!(result.unwrap_err().to_string(), "Note not found: nope");
}
