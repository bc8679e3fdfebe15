use quick_answers::cli::commands::Console;
use quick_answers::util::testing::ScriptedPrompter;

/// Console writing into memory, answering prompts with `confirm`
pub fn console(confirm: bool, json: bool) -> Console<Vec<u8>, ScriptedPrompter> {
    let prompter = ScriptedPrompter {
        confirm,
        password: "secret".to_string(),
        asked: vec![],
    };
    Console::new(Vec::new(), prompter, json)
}

/// Everything written so far, plus the prompts that were asked
#[allow(dead_code)]
pub fn finish(console: Console<Vec<u8>, ScriptedPrompter>) -> (String, Vec<String>) {
    let (out, prompter) = console.into_parts();
    (String::from_utf8_lossy(&out).into_owned(), prompter.asked)
}
