// Copyright 2024 The mintvcs Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Canonical, in-memory encoding and decoding of the three object kinds.
//!
//! Everything in this module is a pure function of bytes: no filesystem
//! access happens here. [`crate::store::Store`] is the layer that combines
//! these with hashing, compression, and the object store to give the
//! "write returns an id, read recovers the body" operations each object
//! kind needs.

use crate::errors::MintError;
use crate::object_id::HEX_LEN;
use crate::object_id::ObjectId;

/// The three object kinds a mintvcs repository stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Blob,
    Tree,
    Commit,
}

impl ObjectKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "blob" => Some(Self::Blob),
            "tree" => Some(Self::Tree),
            "commit" => Some(Self::Commit),
            _ => None,
        }
    }
}

/// The two file-mode values a tree entry can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryMode {
    File,
    Dir,
}

impl EntryMode {
    fn as_str(self) -> &'static str {
        match self {
            Self::File => "100644",
            Self::Dir => "40000",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "100644" => Some(Self::File),
            "40000" => Some(Self::Dir),
            _ => None,
        }
    }
}

/// One entry of a tree object: a name, the mode it was recorded with, and
/// the identity of the blob or tree it names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: EntryMode,
    pub name: String,
    pub id: ObjectId,
}

impl TreeEntry {
    pub fn file(name: impl Into<String>, id: ObjectId) -> Self {
        Self {
            mode: EntryMode::File,
            name: name.into(),
            id,
        }
    }

    pub fn dir(name: impl Into<String>, id: ObjectId) -> Self {
        Self {
            mode: EntryMode::Dir,
            name: name.into(),
            id,
        }
    }

    pub fn is_dir(&self) -> bool {
        self.mode == EntryMode::Dir
    }
}

/// An author or committer line: `<identity> <unix-seconds> <tz-offset>`.
///
/// `identity` is an opaque string (conventionally `Name <email>`); this
/// format never interprets it, only stores and recovers it verbatim. The
/// timezone is recorded as signed minutes east of UTC rather than a
/// `+HHMM`-style string, which keeps parsing unambiguous without losing any
/// information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub identity: String,
    pub timestamp_secs: i64,
    pub tz_offset_minutes: i32,
}

impl Signature {
    pub fn new(identity: impl Into<String>, timestamp_secs: i64, tz_offset_minutes: i32) -> Self {
        Self {
            identity: identity.into(),
            timestamp_secs,
            tz_offset_minutes,
        }
    }

    fn encode(&self) -> String {
        format!(
            "{} {} {}",
            self.identity, self.timestamp_secs, self.tz_offset_minutes
        )
    }

    fn parse(s: &str) -> Result<Self, MintError> {
        // The identity itself may contain spaces ("Jane Doe <jane@x.com>"),
        // so split the two trailing numeric fields off from the right.
        let mut parts = s.rsplitn(3, ' ');
        let tz = parts
            .next()
            .ok_or_else(|| MintError::Format("signature line missing tz offset".into()))?;
        let timestamp = parts
            .next()
            .ok_or_else(|| MintError::Format("signature line missing timestamp".into()))?;
        let identity = parts
            .next()
            .ok_or_else(|| MintError::Format("signature line missing identity".into()))?;
        let tz_offset_minutes = tz
            .parse()
            .map_err(|_| MintError::Format(format!("invalid tz offset {tz:?}")))?;
        let timestamp_secs = timestamp
            .parse()
            .map_err(|_| MintError::Format(format!("invalid timestamp {timestamp:?}")))?;
        Ok(Self::new(identity, timestamp_secs, tz_offset_minutes))
    }
}

/// The parsed body of a commit object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitBody {
    pub tree: ObjectId,
    pub parents: Vec<ObjectId>,
    pub author: Signature,
    pub committer: Signature,
    pub message: String,
}

/// Builds the canonical form `"blob <len>\0" + content`.
pub fn encode_blob(content: &[u8]) -> Vec<u8> {
    encode_with_header(ObjectKind::Blob, content)
}

/// Builds the canonical form of a tree from its entries.
///
/// `entries` must already be in the canonical order (lexicographic by name);
/// this function serializes in whatever order it is given, leaving ordering
/// the caller's responsibility.
pub fn encode_tree(entries: &[TreeEntry]) -> Vec<u8> {
    let mut body = Vec::new();
    for entry in entries {
        body.extend_from_slice(entry.mode.as_str().as_bytes());
        body.push(b' ');
        body.extend_from_slice(entry.name.as_bytes());
        body.push(0);
        body.extend_from_slice(entry.id.hex().as_bytes());
    }
    encode_with_header(ObjectKind::Tree, &body)
}

/// Builds the canonical form of a commit.
pub fn encode_commit(
    tree: &ObjectId,
    parents: &[ObjectId],
    author: &Signature,
    committer: &Signature,
    message: &str,
) -> Vec<u8> {
    let mut body = String::new();
    body.push_str(&format!("tree {}\n", tree.hex()));
    for parent in parents {
        body.push_str(&format!("parent {}\n", parent.hex()));
    }
    body.push_str(&format!("author {}\n", author.encode()));
    body.push_str(&format!("committer {}\n", committer.encode()));
    body.push('\n');
    body.push_str(message);
    encode_with_header(ObjectKind::Commit, body.as_bytes())
}

fn encode_with_header(kind: ObjectKind, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 16);
    out.extend_from_slice(kind.as_str().as_bytes());
    out.push(b' ');
    out.extend_from_slice(body.len().to_string().as_bytes());
    out.push(0);
    out.extend_from_slice(body);
    out
}

/// Splits a decompressed object's raw bytes into its kind and body.
///
/// Fails with [`MintError::CorruptObject`] if there is no NUL separator, the
/// kind is unrecognized, or the declared length doesn't match the body.
pub fn decode(raw: &[u8]) -> Result<(ObjectKind, Vec<u8>), MintError> {
    let corrupt = |reason: &str| MintError::CorruptObject {
        id: String::new(),
        reason: reason.to_owned(),
    };
    let nul = raw
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| corrupt("missing NUL header separator"))?;
    let header =
        std::str::from_utf8(&raw[..nul]).map_err(|_| corrupt("header is not valid UTF-8"))?;
    let (kind_str, len_str) = header
        .split_once(' ')
        .ok_or_else(|| corrupt("header missing length field"))?;
    let kind = ObjectKind::parse(kind_str).ok_or_else(|| corrupt("unknown object kind"))?;
    let declared_len: usize = len_str
        .parse()
        .map_err(|_| corrupt("header length is not a number"))?;
    let body = &raw[nul + 1..];
    if body.len() != declared_len {
        return Err(corrupt(&format!(
            "header declares {declared_len} bytes, body has {}",
            body.len()
        )));
    }
    Ok((kind, body.to_vec()))
}

/// Parses a tree body into its entries.
pub fn decode_tree(body: &[u8]) -> Result<Vec<TreeEntry>, MintError> {
    let corrupt = |reason: String| MintError::CorruptObject {
        id: String::new(),
        reason,
    };
    let mut entries = Vec::new();
    let mut pos = 0;
    while pos < body.len() {
        let space = body[pos..]
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| corrupt("tree entry missing mode separator".into()))?
            + pos;
        let mode_str = std::str::from_utf8(&body[pos..space])
            .map_err(|_| corrupt("tree entry mode is not valid UTF-8".into()))?;
        let mode = EntryMode::parse(mode_str)
            .ok_or_else(|| corrupt(format!("unknown tree entry mode {mode_str:?}")))?;
        pos = space + 1;

        let nul = body[pos..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| corrupt("tree entry missing name terminator".into()))?
            + pos;
        let name = std::str::from_utf8(&body[pos..nul])
            .map_err(|_| corrupt("tree entry name is not valid UTF-8".into()))?
            .to_owned();
        pos = nul + 1;

        if pos + HEX_LEN > body.len() {
            return Err(corrupt("tree entry truncated before child id".into()));
        }
        let id_str = std::str::from_utf8(&body[pos..pos + HEX_LEN])
            .map_err(|_| corrupt("tree entry child id is not valid UTF-8".into()))?;
        let id = ObjectId::from_hex(id_str)
            .map_err(|_| corrupt(format!("tree entry child id {id_str:?} is not valid hex")))?;
        pos += HEX_LEN;

        entries.push(TreeEntry { mode, name, id });
    }
    Ok(entries)
}

/// Parses a commit body into its structured fields.
pub fn decode_commit(body: &[u8]) -> Result<CommitBody, MintError> {
    let corrupt = |reason: &str| MintError::CorruptObject {
        id: String::new(),
        reason: reason.to_owned(),
    };
    let text = std::str::from_utf8(body).map_err(|_| corrupt("commit body is not valid UTF-8"))?;
    let (header, message) = text
        .split_once("\n\n")
        .ok_or_else(|| corrupt("commit body missing header/message separator"))?;

    let mut lines = header.lines();
    let tree_line = lines
        .next()
        .ok_or_else(|| corrupt("commit body missing tree line"))?;
    let tree_hex = tree_line
        .strip_prefix("tree ")
        .ok_or_else(|| corrupt("commit body's first line is not a tree line"))?;
    let tree = ObjectId::from_hex(tree_hex).map_err(|_| corrupt("commit tree id is not valid"))?;

    let mut parents = Vec::new();
    let mut line = lines.next();
    while let Some(current) = line {
        let Some(parent_hex) = current.strip_prefix("parent ") else {
            break;
        };
        let parent =
            ObjectId::from_hex(parent_hex).map_err(|_| corrupt("commit parent id is not valid"))?;
        parents.push(parent);
        line = lines.next();
    }

    let author_line = line.ok_or_else(|| corrupt("commit body missing author line"))?;
    let author_str = author_line
        .strip_prefix("author ")
        .ok_or_else(|| corrupt("commit body missing author line"))?;
    let author = Signature::parse(author_str)?;

    let committer_line = lines
        .next()
        .ok_or_else(|| corrupt("commit body missing committer line"))?;
    let committer_str = committer_line
        .strip_prefix("committer ")
        .ok_or_else(|| corrupt("commit body missing committer line"))?;
    let committer = Signature::parse(committer_str)?;

    Ok(CommitBody {
        tree,
        parents,
        author,
        committer,
        message: message.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(byte: u8) -> ObjectId {
        ObjectId::from_digest(&[byte; 20])
    }

    #[test]
    fn blob_round_trips() {
        let encoded = encode_blob(b"hello\n");
        assert_eq!(&encoded[..8], b"blob 6\0h".as_slice());
        let (kind, body) = decode(&encoded).unwrap();
        assert_eq!(kind, ObjectKind::Blob);
        assert_eq!(body, b"hello\n");
    }

    #[test]
    fn tree_round_trips_and_preserves_order() {
        let entries = vec![
            TreeEntry::dir("a", oid(1)),
            TreeEntry::file("z.txt", oid(2)),
        ];
        let encoded = encode_tree(&entries);
        let (kind, body) = decode(&encoded).unwrap();
        assert_eq!(kind, ObjectKind::Tree);
        let parsed = decode_tree(&body).unwrap();
        assert_eq!(parsed, entries);
    }

    #[test]
    fn commit_round_trips_verbatim_message_and_parents() {
        let tree = oid(1);
        let parents = vec![oid(2), oid(3)];
        let author = Signature::new("Jane Doe <jane@example.com>", 1_700_000_000, -420);
        let committer = author.clone();
        let message = "Multi-line\n\nmessage body.\n";
        let encoded = encode_commit(&tree, &parents, &author, &committer, message);
        let (kind, body) = decode(&encoded).unwrap();
        assert_eq!(kind, ObjectKind::Commit);
        let parsed = decode_commit(&body).unwrap();
        assert_eq!(parsed.tree, tree);
        assert_eq!(parsed.parents, parents);
        assert_eq!(parsed.author, author);
        assert_eq!(parsed.committer, committer);
        assert_eq!(parsed.message, message);
    }

    #[test]
    fn commit_with_no_parents_round_trips() {
        let tree = oid(9);
        let author = Signature::new("a <a@x>", 0, 0);
        let encoded = encode_commit(&tree, &[], &author, &author, "root");
        let (_, body) = decode(&encoded).unwrap();
        let parsed = decode_commit(&body).unwrap();
        assert!(parsed.parents.is_empty());
    }

    #[test]
    fn decode_rejects_missing_nul() {
        let err = decode(b"blob 5 hello").unwrap_err();
        assert!(matches!(err, MintError::CorruptObject { .. }));
    }

    #[test]
    fn decode_rejects_length_mismatch() {
        let mut bad = encode_blob(b"hello");
        bad.push(b'!');
        let err = decode(&bad).unwrap_err();
        assert!(matches!(err, MintError::CorruptObject { .. }));
    }
}
