//! MeshMS menu: conversations and sending messages

use anyhow::Result;
use chrono::DateTime;

use crate::serval::{is_full_sid, short_id, Conversation, Message};
use crate::ui::dialog::Dialog;
use crate::ui::flows::{choices, report_errors};
use crate::ui::widgets::MenuChoice;
use crate::ui::App;

/// Header of the conversation list, aligned over a 64-character SID
pub fn conversation_list_header() -> String {
    format!("Remote SID{}Read", " ".repeat(55))
}

/// Conversation list text: header, then `<their_sid> <read>` per line
pub fn conversation_list(conversations: &[Conversation]) -> String {
    let mut output = conversation_list_header();
    output.push('\n');
    for c in conversations {
        output.push_str(&format!("{} {}\n", c.their_sid, c.read));
    }
    output
}

/// `> text` for sent and `< text` for received messages; acks are skipped
pub fn message_line(message: &Message) -> Option<String> {
    if !message.kind.is_text() {
        return None;
    }
    let text = message.text.as_deref().unwrap_or("");
    let mut line = format!("{} {}", message.kind.marker(), text);
    if let Some(when) = message.timestamp.and_then(|ts| DateTime::from_timestamp(ts, 0)) {
        line.push_str(&format!("  [{}]", when.format("%Y-%m-%d %H:%M UTC")));
    }
    Some(line)
}

/// Conversation text, oldest message first
pub fn conversation_text(newest_first: &[Message]) -> String {
    newest_first
        .iter()
        .rev()
        .filter_map(message_line)
        .map(|line| line + "\n")
        .collect()
}

pub(crate) fn perform_meshms_menu(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    let menu = choices(&[
        ("1)", "List Conversations"),
        ("2)", "Read Conversation"),
        ("3)", "Add to Conversation"),
        ("4)", "New Message"),
        ("b)", "back"),
    ]);

    loop {
        let Some(tag) = dialog.menu("MeshMS Actions:", &menu)? else {
            return Ok(());
        };
        let result = match tag.as_str() {
            "b)" => return Ok(()),
            "1)" => list_conversations(app, dialog),
            "2)" => read_conversation(app, dialog),
            "3)" => add_to_conversation(app, dialog),
            "4)" => new_message(app, dialog),
            _ => Ok(()),
        };
        report_errors(dialog, result)?;
    }
}

fn list_conversations(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    let sid = app.require_sid()?;
    let conversations = app.api.conversations(sid)?;
    dialog.scrollbox(&conversation_list(&conversations), " Conversations ")
}

/// Pick a conversation; unread ones are marked `NEW`
fn select_conversation(app: &mut App, dialog: &mut dyn Dialog) -> Result<Option<String>> {
    let sid = app.require_sid()?;
    let conversations = app.api.conversations(sid)?;
    if conversations.is_empty() {
        dialog.msgbox("No conversations yet.")?;
        return Ok(None);
    }

    let entries = conversations
        .iter()
        .map(|c| MenuChoice::new(c.their_sid.as_str(), if c.read { "" } else { "NEW" }))
        .collect::<Vec<_>>();
    Ok(dialog
        .menu("Select conversation", &entries)?
        .filter(|tag| is_full_sid(tag)))
}

fn read_conversation(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    let Some(their_sid) = select_conversation(app, dialog)? else {
        return Ok(());
    };
    let my_sid = app.require_sid()?;
    app.api.mark_all_read(my_sid, &their_sid)?;
    let messages = app.api.messages(my_sid, &their_sid)?;
    dialog.scrollbox(
        &conversation_text(&messages),
        &format!(" Conversation with {} ", short_id(&their_sid)),
    )
}

fn add_to_conversation(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    match select_conversation(app, dialog)? {
        Some(their_sid) => send_message(app, dialog, &their_sid),
        None => Ok(()),
    }
}

fn new_message(app: &mut App, dialog: &mut dyn Dialog) -> Result<()> {
    let their_sid = if dialog.yesno("Select remote peer from list?")? {
        let peers = app.daemon.all_peers()?;
        let entries = peers
            .iter()
            .map(|p| MenuChoice::new(p.as_str(), ""))
            .collect::<Vec<_>>();
        dialog.menu("Select remote peer:", &entries)?
    } else {
        dialog
            .inputbox("Remote SID:", "")?
            .map(|s| s.trim().to_string())
    };

    match their_sid {
        Some(sid) if is_full_sid(&sid) => send_message(app, dialog, &sid),
        Some(sid) if !sid.is_empty() => dialog.msgbox(&format!("Not a valid SID: {}", sid)),
        _ => Ok(()),
    }
}

/// Ask for a message to `their_sid`, confirm and send it
fn send_message(app: &mut App, dialog: &mut dyn Dialog, their_sid: &str) -> Result<()> {
    let short = short_id(their_sid);
    let Some(text) = dialog.inputbox(&format!("Message @ {}:", short), "")? else {
        return Ok(());
    };
    if text.is_empty() {
        return Ok(());
    }

    if !dialog.yesno(&format!("Really send \n\"{}\" \nto {}?", text, short))? {
        return dialog.msgbox("Discarded message!");
    }

    let my_sid = app.require_sid()?;
    app.api.send_message(my_sid, their_sid, &text)?;
    tracing::info!("Message sent to {}", short);
    dialog.msgbox("Message sent!")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serval::MessageKind;
    use crate::ui::flows::testing::{app, message, Answer, FakeApi, FakeDialog, THEIR_SID};

    fn api_with_conversation() -> FakeApi {
        let api = FakeApi::default();
        {
            let mut state = api.state.borrow_mut();
            state.conversations = vec![Conversation {
                their_sid: THEIR_SID.to_string(),
                read: false,
            }];
            state.messages = vec![
                message(MessageKind::Received, Some("fine, you?")),
                message(MessageKind::Other("ACK".into()), None),
                message(MessageKind::Sent, Some("how are you")),
            ];
        }
        api
    }

    #[test]
    fn test_list_header_width() {
        let header = conversation_list_header();
        assert_eq!(header.find("Read"), Some(65));
        assert!(header.starts_with("Remote SID "));
    }

    #[test]
    fn test_conversation_text_oldest_first() {
        let api = api_with_conversation();
        let text = conversation_text(&api.state.borrow().messages);
        assert_eq!(text, "> how are you\n< fine, you?\n");
    }

    #[test]
    fn test_message_line_with_timestamp() {
        let mut m = message(MessageKind::Sent, Some("hi"));
        m.timestamp = Some(1_500_000_000);
        assert_eq!(message_line(&m).unwrap(), "> hi  [2017-07-14 02:40 UTC]");
    }

    #[test]
    fn test_list_conversations() {
        let api = api_with_conversation();
        let mut app = app(&api);
        let mut dialog = FakeDialog::new(vec![
            Answer::Menu(Some("1)".into())),
            Answer::Menu(Some("b)".into())),
        ]);
        perform_meshms_menu(&mut app, &mut dialog).unwrap();
        assert_eq!(
            dialog.shown[0],
            format!("{}\n{} false\n", conversation_list_header(), THEIR_SID)
        );
    }

    #[test]
    fn test_read_marks_conversation_read() {
        let api = api_with_conversation();
        let mut app = app(&api);
        let mut dialog = FakeDialog::new(vec![
            Answer::Menu(Some("2)".into())),
            Answer::Menu(Some(THEIR_SID.into())),
            Answer::Menu(None),
        ]);
        perform_meshms_menu(&mut app, &mut dialog).unwrap();

        assert_eq!(dialog.menus[1][0].label, "NEW");
        assert_eq!(api.state.borrow().marked_read, vec![THEIR_SID.to_string()]);
        assert_eq!(dialog.shown, vec!["> how are you\n< fine, you?\n".to_string()]);
    }

    #[test]
    fn test_add_to_conversation_sends() {
        let api = api_with_conversation();
        let mut app = app(&api);
        let mut dialog = FakeDialog::new(vec![
            Answer::Menu(Some("3)".into())),
            Answer::Menu(Some(THEIR_SID.into())),
            Answer::Input(Some("see you".into())),
            Answer::YesNo(true),
            Answer::Menu(Some("b)".into())),
        ]);
        perform_meshms_menu(&mut app, &mut dialog).unwrap();

        assert_eq!(
            api.state.borrow().sent,
            vec![(THEIR_SID.to_string(), "see you".to_string())]
        );
        assert_eq!(dialog.shown, vec!["Message sent!".to_string()]);
        assert_eq!(dialog.questions[0], "Message @ ABCDEF01*:");
        assert_eq!(dialog.questions[1], "Really send \n\"see you\" \nto ABCDEF01*?");
    }

    #[test]
    fn test_new_message_typed_sid_discarded() {
        let api = FakeApi::default();
        let mut app = app(&api);
        let mut dialog = FakeDialog::new(vec![
            Answer::Menu(Some("4)".into())),
            Answer::YesNo(false),
            Answer::Input(Some(format!(" {} ", THEIR_SID))),
            Answer::Input(Some("hello".into())),
            Answer::YesNo(false),
            Answer::Menu(Some("b)".into())),
        ]);
        perform_meshms_menu(&mut app, &mut dialog).unwrap();

        assert!(api.state.borrow().sent.is_empty());
        assert_eq!(dialog.shown, vec!["Discarded message!".to_string()]);
    }

    #[test]
    fn test_new_message_invalid_sid() {
        let api = FakeApi::default();
        let mut app = app(&api);
        let mut dialog = FakeDialog::new(vec![
            Answer::Menu(Some("4)".into())),
            Answer::YesNo(false),
            Answer::Input(Some("ABCD".into())),
            Answer::Menu(Some("b)".into())),
        ]);
        perform_meshms_menu(&mut app, &mut dialog).unwrap();
        assert_eq!(dialog.shown, vec!["Not a valid SID: ABCD".to_string()]);
    }

    #[test]
    fn test_empty_message_not_sent() {
        let api = api_with_conversation();
        let mut app = app(&api);
        let mut dialog = FakeDialog::new(vec![
            Answer::Menu(Some("3)".into())),
            Answer::Menu(Some(THEIR_SID.into())),
            Answer::Input(Some(String::new())),
            Answer::Menu(Some("b)".into())),
        ]);
        perform_meshms_menu(&mut app, &mut dialog).unwrap();
        assert!(api.state.borrow().sent.is_empty());
        assert!(dialog.shown.is_empty());
    }

    #[test]
    fn test_no_identity_is_reported() {
        let api = api_with_conversation();
        let mut app = app(&api);
        app.my_sid = None;
        let mut dialog = FakeDialog::new(vec![
            Answer::Menu(Some("1)".into())),
            Answer::Menu(Some("b)".into())),
        ]);
        perform_meshms_menu(&mut app, &mut dialog).unwrap();
        assert!(dialog.shown[0].contains("No local identity"));
    }
}
