//! What the user sees: a chat log and a shared-files panel.
//!
//! Entries are appended in the order they happen locally, so a message the
//! user sends always lands after everything received before it.

use bytes::Bytes;
use std::fmt;

use crossdrop_shared::time::timestamp_to_jst_clock;

use super::mime::mime_type_for;

/// Who produced an entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Sent by this client (rendered as local echo)
    Local,
    /// Relayed from another room member
    Peer,
}

/// How a shared file is offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewKind {
    Image,
    Pdf,
    Download,
}

impl PreviewKind {
    /// Pick the preview from the file name's extension
    pub fn from_file_name(file_name: &str) -> Self {
        let lower = file_name.to_ascii_lowercase();
        let ext = lower.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        match ext {
            "jpg" | "jpeg" | "png" | "gif" | "webp" => PreviewKind::Image,
            "pdf" => PreviewKind::Pdf,
            _ => PreviewKind::Download,
        }
    }
}

impl fmt::Display for PreviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PreviewKind::Image => "image",
            PreviewKind::Pdf => "pdf",
            PreviewKind::Download => "file",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub sender: String,
    pub text: String,
    pub origin: Origin,
    /// Unix milliseconds at which the entry was appended
    pub at: i64,
}

impl fmt::Display for ChatEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            timestamp_to_jst_clock(self.at),
            self.sender,
            self.text
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub name: String,
    pub mime_type: String,
    pub payload: Bytes,
    pub preview: PreviewKind,
    pub origin: Origin,
    pub at: i64,
}

impl FileEntry {
    pub fn new(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        payload: Bytes,
        origin: Origin,
        at: i64,
    ) -> Self {
        let name = name.into();
        let mut mime_type = mime_type.into();
        if mime_type.is_empty() {
            mime_type = mime_type_for(&name);
        }
        Self {
            preview: PreviewKind::from_file_name(&name),
            name,
            mime_type,
            payload,
            origin,
            at,
        }
    }

    pub fn size(&self) -> usize {
        self.payload.len()
    }
}

impl fmt::Display for FileEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let who = match self.origin {
            Origin::Local => "you",
            Origin::Peer => "peer",
        };
        write!(
            f,
            "{} ({}, {} bytes, {}) from {}",
            self.name,
            self.mime_type,
            self.size(),
            self.preview,
            who
        )
    }
}

/// A single appended entry, handed to observers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEntry {
    Message(ChatEntry),
    File(FileEntry),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    messages: Vec<ChatEntry>,
    files: Vec<FileEntry>,
}

impl View {
    pub fn messages(&self) -> &[ChatEntry] {
        &self.messages
    }

    pub fn files(&self) -> &[FileEntry] {
        &self.files
    }

    pub(crate) fn push_message(&mut self, entry: ChatEntry) {
        self.messages.push(entry);
    }

    pub(crate) fn push_file(&mut self, entry: FileEntry) {
        self.files.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_kind_by_extension() {
        // テスト項目: 拡張子に応じてプレビュー種別が決まる
        // then (期待する結果):
        assert_eq!(PreviewKind::from_file_name("a.PNG"), PreviewKind::Image);
        assert_eq!(PreviewKind::from_file_name("b.webp"), PreviewKind::Image);
        assert_eq!(PreviewKind::from_file_name("c.pdf"), PreviewKind::Pdf);
        assert_eq!(
            PreviewKind::from_file_name("d.tar.gz"),
            PreviewKind::Download
        );
        assert_eq!(PreviewKind::from_file_name("noext"), PreviewKind::Download);
    }

    #[test]
    fn test_file_entry_fills_missing_mime_type() {
        // テスト項目: MIME タイプが空なら拡張子から補完する
        // when (操作):
        let entry = FileEntry::new(
            "scan.pdf",
            "",
            Bytes::from_static(b"%PDF"),
            Origin::Peer,
            0,
        );

        // then (期待する結果):
        assert_eq!(entry.mime_type, "application/pdf");
        assert_eq!(entry.preview, PreviewKind::Pdf);
        assert_eq!(entry.size(), 4);
    }

    #[test]
    fn test_file_entry_keeps_supplied_mime_type() {
        // テスト項目: 送信者が指定した MIME タイプはそのまま使う
        // when (操作):
        let entry = FileEntry::new("blob", "text/plain", Bytes::new(), Origin::Local, 0);

        // then (期待する結果):
        assert_eq!(entry.mime_type, "text/plain");
        assert_eq!(entry.preview, PreviewKind::Download);
    }
}
