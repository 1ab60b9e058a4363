//! Interactive terminal front end.
//!
//! Lines typed at the prompt become chat messages unless they start with a
//! `/` command. Notifications from the session are printed as they arrive.

use std::path::{Path, PathBuf};

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::{broadcast, mpsc};

use crossdrop_shared::time::timestamp_to_jst_clock;

use crate::client::{ClientNotification, SessionClient};
use crate::config::{ClientArgs, SessionConfig, resolve_display_name, resolve_room};
use crate::domain::{DisplayName, FileEntry, Origin, Session};
use crate::error::ClientError;
use crate::store::{LocalStore, PersistedState};

const HELP: &str = "\
Commands:
  <text>           send a message to the room
  /file <path>     share a file (up to 50MB)
  /name <name>     change your display name
  /room            show the room token and share path
  /files           list shared files
  /save <index>    save a shared file to the download directory
  /quit            leave";

/// A parsed prompt line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Empty,
    Text(String),
    File(PathBuf),
    Name(String),
    Room,
    Files,
    Save(usize),
    Help,
    Quit,
    /// A `/` command that could not be understood, with a usage hint
    Invalid(String),
}

pub fn parse_input(line: &str) -> Input {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Input::Empty;
    }
    let Some(command) = trimmed.strip_prefix('/') else {
        return Input::Text(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };
    match (name, arg) {
        ("quit" | "exit", _) => Input::Quit,
        ("help", _) => Input::Help,
        ("room", _) => Input::Room,
        ("files", _) => Input::Files,
        ("file", "") => Input::Invalid("usage: /file <path>".to_string()),
        ("file", path) => Input::File(PathBuf::from(path)),
        ("name", "") => Input::Invalid("usage: /name <name>".to_string()),
        ("name", new_name) => Input::Name(new_name.to_string()),
        ("save", index) => match index.parse() {
            Ok(index) => Input::Save(index),
            Err(_) => Input::Invalid("usage: /save <index>".to_string()),
        },
        (other, _) => Input::Invalid(format!("unknown command: /{other} (try /help)")),
    }
}

/// Run the interactive client until the user quits
pub async fn run(args: ClientArgs) -> Result<(), ClientError> {
    let store_path = args
        .state_file
        .clone()
        .or_else(LocalStore::default_path)
        .unwrap_or_else(|| PathBuf::from("crossdrop-state.json"));
    let store = LocalStore::new(store_path);
    let persisted = store.load()?;

    let room = resolve_room(&args, &persisted);
    let display_name = resolve_display_name(&args, &persisted)?;
    persist(&store, &display_name, room.as_str());

    println!("Room: {}  (share: {})", room, room.share_path());
    println!("You are {}. Type /help for commands.", display_name);

    let client = SessionClient::start(
        SessionConfig::from(&args),
        Session::new(room, display_name),
    );
    let printer = tokio::spawn(print_notifications(client.subscribe()));
    let (lines_tx, mut lines_rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || read_lines(lines_tx));

    while let Some(line) = lines_rx.recv().await {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read input: {}", e);
                break;
            }
        };
        match parse_input(&line) {
            Input::Empty => {}
            Input::Quit => break,
            input => {
                if let Err(e) = handle_input(&client, &store, &args.download_dir, input).await {
                    eprintln!("! {e}");
                }
            }
        }
    }

    printer.abort();
    client.shutdown().await;
    Ok(())
}

async fn handle_input(
    client: &SessionClient,
    store: &LocalStore,
    download_dir: &Path,
    input: Input,
) -> Result<(), ClientError> {
    match input {
        Input::Text(text) => client.send_text(&text).await?,
        Input::File(path) => {
            client.send_file(&path).await?;
            println!("Sent {}", path.display());
        }
        Input::Name(name) => {
            let name = DisplayName::new(name)?;
            client.set_display_name(name.clone()).await;
            persist(store, &name, client.room().await.as_str());
            println!("You are now {name}");
        }
        Input::Room => {
            let room = client.room().await;
            println!(
                "Room: {}  (share: {})  [{}]",
                room,
                room.share_path(),
                client.state().await
            );
        }
        Input::Files => {
            let view = client.view().await;
            if view.files().is_empty() {
                println!("No shared files yet");
            }
            for (index, file) in view.files().iter().enumerate() {
                println!("{index:>3}  {file}");
            }
        }
        Input::Save(index) => {
            let view = client.view().await;
            let file = view
                .files()
                .get(index)
                .ok_or(ClientError::NoSuchFile(index))?;
            let path = save_file(file, download_dir).await?;
            println!("Saved {}", path.display());
        }
        Input::Help => println!("{HELP}"),
        Input::Invalid(hint) => println!("{hint}"),
        Input::Empty | Input::Quit => {}
    }
    Ok(())
}

/// Write a shared file into `dir`, keeping only the final path component of its name
pub async fn save_file(file: &FileEntry, dir: &Path) -> Result<PathBuf, ClientError> {
    let name = Path::new(&file.name)
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "download".into());
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(name);
    tokio::fs::write(&path, &file.payload).await?;
    Ok(path)
}

fn persist(store: &LocalStore, display_name: &DisplayName, room: &str) {
    let state = PersistedState {
        display_name: Some(display_name.as_str().to_string()),
        current_room: Some(room.to_string()),
    };
    if let Err(e) = store.save(&state) {
        tracing::warn!("Failed to save client state: {}", e);
    }
}

fn read_lines(tx: mpsc::UnboundedSender<Result<String, ReadlineError>>) {
    let mut editor = match DefaultEditor::new() {
        Ok(editor) => editor,
        Err(e) => {
            let _ = tx.send(Err(e));
            return;
        }
    };
    loop {
        match editor.readline("> ") {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                if tx.send(Ok(line)).is_err() {
                    break;
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => {
                let _ = tx.send(Ok("/quit".to_string()));
                break;
            }
            Err(e) => {
                let _ = tx.send(Err(e));
                break;
            }
        }
    }
}

async fn print_notifications(mut rx: broadcast::Receiver<ClientNotification>) {
    loop {
        match rx.recv().await {
            Ok(ClientNotification::StateChanged(state)) => println!("* {state}"),
            Ok(ClientNotification::MessageReceived(entry)) => println!("{entry}"),
            Ok(ClientNotification::FileReceived(file)) if file.origin == Origin::Peer => {
                println!(
                    "[{}] received {} (/files to list)",
                    timestamp_to_jst_clock(file.at),
                    file
                );
            }
            Ok(ClientNotification::FileReceived(_)) => {}
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!("Skipped {} notifications", n);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_plain_text_is_sent_as_typed() {
        // テスト項目: スラッシュで始まらない行はそのままメッセージになる
        // then (期待する結果):
        assert_eq!(parse_input(" hi there"), Input::Text(" hi there".to_string()));
        assert_eq!(parse_input("   "), Input::Empty);
    }

    #[test]
    fn test_commands_are_parsed() {
        // テスト項目: 各コマンドが正しく解釈される
        // then (期待する結果):
        assert_eq!(
            parse_input("/file ./a b.png"),
            Input::File(PathBuf::from("./a b.png"))
        );
        assert_eq!(parse_input("/name  bob "), Input::Name("bob".to_string()));
        assert_eq!(parse_input("/save 2"), Input::Save(2));
        assert_eq!(parse_input("/room"), Input::Room);
        assert_eq!(parse_input("/files"), Input::Files);
        assert_eq!(parse_input("/quit"), Input::Quit);
    }

    #[test]
    fn test_invalid_commands() {
        // テスト項目: 引数不足や未知のコマンドは Invalid になる
        // then (期待する結果):
        assert!(matches!(parse_input("/file"), Input::Invalid(_)));
        assert!(matches!(parse_input("/save x"), Input::Invalid(_)));
        assert!(matches!(parse_input("/dance"), Input::Invalid(_)));
    }

    #[tokio::test]
    async fn test_save_file_strips_directories() {
        // テスト項目: 保存時はファイル名のディレクトリ部分を無視する
        // given (前提条件):
        let temp = tempfile::tempdir().unwrap();
        let dir = temp.path().join("downloads");
        let file = FileEntry::new(
            "../../etc/notes.txt",
            "text/plain",
            Bytes::from_static(b"hello"),
            Origin::Peer,
            0,
        );

        // when (操作):
        let path = save_file(&file, &dir).await.unwrap();

        // then (期待する結果):
        assert_eq!(path, dir.join("notes.txt"));
        assert_eq!(std::fs::read(&path).unwrap(), b"hello");
    }
}
