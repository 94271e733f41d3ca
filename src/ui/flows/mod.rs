//! Menu flows (peers, rhizome, MeshMS, maintenance, settings, startup).

pub mod main_menu;
pub mod maintenance;
pub mod meshms;
pub mod peers;
pub mod rhizome;
pub mod settings;
pub mod startup;

use anyhow::Result;

use crate::ui::dialog::Dialog;
use crate::ui::widgets::MenuChoice;

/// Show a failed action to the user instead of aborting the program
pub(crate) fn report_errors(dialog: &mut dyn Dialog, result: Result<()>) -> Result<()> {
    if let Err(e) = result {
        tracing::error!("{:#}", e);
        dialog.msgbox(&format!("{:#}", e))?;
    }
    Ok(())
}

pub(crate) fn choices(items: &[(&str, &str)]) -> Vec<MenuChoice> {
    items
        .iter()
        .map(|(tag, label)| MenuChoice::new(*tag, *label))
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted dialog and in-memory REST API for flow tests

    use anyhow::{bail, Result};
    use std::cell::RefCell;
    use std::collections::{HashMap, VecDeque};
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    use crate::serval::{
        Bundle, Conversation, Identity, Message, MessageKind, ServalApi, ServalDaemon,
    };
    use crate::settings::{Settings, SettingsStore};
    use crate::ui::dialog::Dialog;
    use crate::ui::widgets::{FormField, MenuChoice};
    use crate::ui::App;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Answer {
        Input(Option<String>),
        Menu(Option<String>),
        YesNo(bool),
        Form(Option<Vec<String>>),
        File(Option<PathBuf>),
    }

    /// Answers questions from a script and records everything shown
    #[derive(Debug, Default)]
    pub struct FakeDialog {
        answers: VecDeque<Answer>,
        pub title: String,
        /// Text of every infobox, msgbox and scrollbox, in order
        pub shown: Vec<String>,
        /// Choices offered by each menu, in order
        pub menus: Vec<Vec<MenuChoice>>,
        pub questions: Vec<String>,
    }

    impl FakeDialog {
        pub fn new(answers: Vec<Answer>) -> Self {
            Self {
                answers: answers.into(),
                ..Self::default()
            }
        }

        pub fn finished(&self) -> bool {
            self.answers.is_empty()
        }

        fn next(&mut self, what: &str) -> Result<Answer> {
            match self.answers.pop_front() {
                Some(answer) => Ok(answer),
                None => bail!("no scripted answer for {}", what),
            }
        }
    }

    impl Dialog for FakeDialog {
        fn set_background_title(&mut self, title: &str) {
            self.title = title.to_string();
        }

        fn infobox(&mut self, text: &str) -> Result<()> {
            self.shown.push(text.to_string());
            Ok(())
        }

        fn msgbox(&mut self, text: &str) -> Result<()> {
            self.shown.push(text.to_string());
            Ok(())
        }

        fn scrollbox(&mut self, text: &str, _title: &str) -> Result<()> {
            self.shown.push(text.to_string());
            Ok(())
        }

        fn inputbox(&mut self, prompt: &str, _initial: &str) -> Result<Option<String>> {
            self.questions.push(prompt.to_string());
            match self.next(prompt)? {
                Answer::Input(value) => Ok(value),
                other => bail!("expected input answer for {:?}, got {:?}", prompt, other),
            }
        }

        fn menu(&mut self, prompt: &str, choices: &[MenuChoice]) -> Result<Option<String>> {
            self.menus.push(choices.to_vec());
            match self.next(prompt)? {
                Answer::Menu(tag) => Ok(tag),
                other => bail!("expected menu answer for {:?}, got {:?}", prompt, other),
            }
        }

        fn yesno(&mut self, question: &str) -> Result<bool> {
            self.questions.push(question.to_string());
            match self.next(question)? {
                Answer::YesNo(yes) => Ok(yes),
                other => bail!("expected yes/no answer for {:?}, got {:?}", question, other),
            }
        }

        fn form(&mut self, title: &str, _fields: &[FormField]) -> Result<Option<Vec<String>>> {
            match self.next(title)? {
                Answer::Form(values) => Ok(values),
                other => bail!("expected form answer for {:?}, got {:?}", title, other),
            }
        }

        fn fselect(&mut self, dir: &Path) -> Result<Option<PathBuf>> {
            self.questions.push(dir.display().to_string());
            match self.next("file selection")? {
                Answer::File(path) => Ok(path),
                other => bail!("expected file answer in {:?}, got {:?}", dir, other),
            }
        }
    }

    #[derive(Debug, Default)]
    pub struct FakeState {
        pub identities: Vec<Identity>,
        pub bundles: Vec<Bundle>,
        pub payloads: HashMap<String, Vec<u8>>,
        pub conversations: Vec<Conversation>,
        pub messages: Vec<Message>,
        /// (their_sid, text) of every sent message
        pub sent: Vec<(String, String)>,
        pub marked_read: Vec<String>,
    }

    /// In-memory [`ServalApi`]; clones share state
    #[derive(Debug, Clone, Default)]
    pub struct FakeApi {
        pub state: Rc<RefCell<FakeState>>,
    }

    impl ServalApi for FakeApi {
        fn identities(&self) -> Result<Vec<Identity>> {
            Ok(self.state.borrow().identities.clone())
        }

        fn rhizome_list(&self) -> Result<Vec<Bundle>> {
            Ok(self.state.borrow().bundles.clone())
        }

        fn rhizome_raw(&self, bid: &str) -> Result<Vec<u8>> {
            match self.state.borrow().payloads.get(bid) {
                Some(payload) => Ok(payload.clone()),
                None => bail!("HTTP 404 from rhizome/{}/raw.bin", bid),
            }
        }

        fn conversations(&self, _my_sid: &str) -> Result<Vec<Conversation>> {
            Ok(self.state.borrow().conversations.clone())
        }

        fn messages(&self, _my_sid: &str, _their_sid: &str) -> Result<Vec<Message>> {
            Ok(self.state.borrow().messages.clone())
        }

        fn send_message(&self, _my_sid: &str, their_sid: &str, text: &str) -> Result<()> {
            self.state
                .borrow_mut()
                .sent
                .push((their_sid.to_string(), text.to_string()));
            Ok(())
        }

        fn mark_all_read(&self, _my_sid: &str, their_sid: &str) -> Result<()> {
            self.state.borrow_mut().marked_read.push(their_sid.to_string());
            Ok(())
        }
    }

    pub const MY_SID: &str = "1111111111111111111111111111111111111111111111111111111111111111";
    pub const THEIR_SID: &str = "ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789ABCDEF0123456789";

    pub fn bundle(service: &str, id: &str, filesize: u64, name: Option<&str>) -> Bundle {
        Bundle {
            service: service.to_string(),
            id: id.to_string(),
            filesize,
            sender: None,
            recipient: None,
            name: name.map(str::to_string),
        }
    }

    pub fn message(kind: MessageKind, text: Option<&str>) -> Message {
        Message {
            kind,
            text: text.map(str::to_string),
            timestamp: None,
        }
    }

    /// App wired to `api`; the servald binary does not exist, so CLI calls fail
    pub fn app_with(api: &FakeApi, store: SettingsStore) -> App {
        let mut settings = Settings::defaults();
        settings.serval_binary = "/nonexistent/servald".into();
        let api = api.clone();
        let mut app = App::with_connector(
            settings,
            store,
            Box::new(move |s: &Settings| {
                (
                    ServalDaemon::from_settings(s),
                    Box::new(api.clone()) as Box<dyn ServalApi>,
                )
            }),
        );
        app.my_sid = Some(MY_SID.to_string());
        app
    }

    pub fn app(api: &FakeApi) -> App {
        app_with(api, SettingsStore::new("/nonexistent/.sdnatuirc"))
    }
}
