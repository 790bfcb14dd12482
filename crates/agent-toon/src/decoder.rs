//! TOON decoder — converts TOON text into an ordered [`Mapping`].
//!
//! The decoder is a single pass over the input lines with a stack of open
//! containers. Indentation alone encodes nesting: a line belongs to the nearest
//! open container whose indent is smaller than its own, and any line at or
//! below a container's indent closes it first.
//!
//! # Key design decisions
//!
//! - **Deferred containers**: `key:` with nothing after the colon opens an
//!   *undetermined* node. The first child line decides what it becomes: a
//!   `- item` line makes it a scalar list, a `name: value` line a mapping, and
//!   any other line a table header. Nothing is inserted and later replaced, so
//!   there is no search for the owning key.
//! - **Arena of nodes**: containers live in a `Vec` and refer to children by
//!   index. Children are always allocated after their parent, which lets
//!   the final pass assemble the result bottom-up without recursion.
//! - **Tolerance over strictness**: model output is not fully controlled, so
//!   unrecognised lines are skipped (logged at `trace`) instead of failing.

use crate::scalar::{coerce, split_fields};
use crate::types::{Delimiter, Mapping};
use log::trace;
use serde_json::Value;

/// Deepest container nesting the decoder will open. A `key:` past this depth
/// decodes to an empty mapping and every line under it is skipped.
const MAX_DEPTH: usize = 128;

/// Decode TOON text into a mapping.
///
/// Never fails: blank input yields an empty mapping and lines that fit no
/// construct are ignored.
///
/// ```
/// use agent_toon::loads;
/// use serde_json::json;
///
/// let doc = loads("name: Alpha\ntags:\n  - red\n  - green");
/// assert_eq!(
///     serde_json::Value::Object(doc),
///     json!({"name": "Alpha", "tags": ["red", "green"]})
/// );
/// ```
pub fn loads(text: &str) -> Mapping {
    let mut doc = Document::new();
    for (idx, line) in text.lines().enumerate() {
        let content = line.trim();
        if content.is_empty() {
            continue;
        }
        doc.feed(count_indent(line), content, idx + 1);
    }
    doc.finish()
}

type NodeId = usize;

const ROOT: NodeId = 0;

enum Slot {
    Scalar(Value),
    Node(NodeId),
}

enum Node {
    /// Opened by `key:`; the first child line settles its kind.
    Undetermined,
    /// Opened past [`MAX_DEPTH`]; swallows its children.
    Capped,
    Mapping(Vec<(String, Slot)>),
    ScalarList(Vec<Value>),
    Table {
        delimiter: Delimiter,
        headers: Vec<String>,
        rows: Vec<Mapping>,
    },
}

/// An open container and the indent of the line that opened it.
/// The root has no indent and is never closed.
struct Frame {
    node: NodeId,
    indent: Option<usize>,
}

struct Document {
    nodes: Vec<Node>,
    stack: Vec<Frame>,
}

impl Document {
    fn new() -> Self {
        Self {
            nodes: vec![Node::Mapping(Vec::new())],
            stack: vec![Frame {
                node: ROOT,
                indent: None,
            }],
        }
    }

    fn feed(&mut self, indent: usize, content: &str, line: usize) {
        while self
            .stack
            .last()
            .is_some_and(|frame| frame.indent.is_some_and(|open| open >= indent))
        {
            self.stack.pop();
        }
        let top = self.top();

        if matches!(self.nodes[top], Node::Capped) {
            trace!("line {line}: inside a block nested deeper than {MAX_DEPTH}, skipped");
        } else if matches!(self.nodes[top], Node::Table { .. }) {
            self.push_row(top, content);
        } else if let Some(item) = content.strip_prefix("- ") {
            self.push_item(top, item, line);
        } else if let Some((key, value)) = content.split_once(':') {
            self.push_entry(top, key.trim(), value.trim(), indent, line);
        } else {
            self.open_table(top, content, line);
        }
    }

    fn top(&self) -> NodeId {
        self.stack.last().map_or(ROOT, |frame| frame.node)
    }

    fn push_item(&mut self, top: NodeId, item: &str, line: usize) {
        let node = &mut self.nodes[top];
        if matches!(node, Node::Undetermined) {
            *node = Node::ScalarList(Vec::new());
        }
        match node {
            Node::ScalarList(items) => items.push(coerce(item)),
            _ => trace!("line {line}: list item outside a list, ignored"),
        }
    }

    fn push_entry(&mut self, top: NodeId, key: &str, value: &str, indent: usize, line: usize) {
        let node = &mut self.nodes[top];
        if matches!(node, Node::Undetermined) {
            *node = Node::Mapping(Vec::new());
        }
        if !matches!(node, Node::Mapping(_)) {
            trace!("line {line}: key `{key}` inside a list, ignored");
            return;
        }

        let slot = if value.is_empty() {
            let kind = if self.stack.len() > MAX_DEPTH {
                trace!("line {line}: nesting deeper than {MAX_DEPTH}, `{key}` left empty");
                Node::Capped
            } else {
                Node::Undetermined
            };
            let child = self.nodes.len();
            self.nodes.push(kind);
            self.stack.push(Frame {
                node: child,
                indent: Some(indent),
            });
            Slot::Node(child)
        } else if value == "[]" {
            Slot::Scalar(Value::Array(Vec::new()))
        } else {
            Slot::Scalar(coerce(value))
        };

        if let Node::Mapping(entries) = &mut self.nodes[top] {
            match entries.iter_mut().find(|(existing, _)| existing == key) {
                Some(entry) => entry.1 = slot,
                None => entries.push((key.to_string(), slot)),
            }
        }
    }

    fn open_table(&mut self, top: NodeId, header: &str, line: usize) {
        let node = &mut self.nodes[top];
        if !matches!(node, Node::Undetermined) {
            trace!("line {line}: unrecognised line ignored: {header}");
            return;
        }
        let delimiter = Delimiter::detect(header);
        *node = Node::Table {
            delimiter,
            headers: split_fields(header, delimiter),
            rows: Vec::new(),
        };
    }

    /// Fields pair with headers positionally; missing trailing fields are
    /// omitted and surplus fields dropped.
    fn push_row(&mut self, top: NodeId, content: &str) {
        if let Node::Table {
            delimiter,
            headers,
            rows,
        } = &mut self.nodes[top]
        {
            let values = split_fields(content, *delimiter);
            let row: Mapping = headers
                .iter()
                .zip(&values)
                .map(|(header, value)| (header.clone(), coerce(value)))
                .collect();
            rows.push(row);
        }
    }

    /// Assemble the final value tree, children before parents.
    fn finish(self) -> Mapping {
        let mut built: Vec<Value> = Vec::new();
        built.resize_with(self.nodes.len(), Value::default);

        for (id, node) in self.nodes.into_iter().enumerate().rev() {
            let value = match node {
                Node::Undetermined | Node::Capped => Value::Object(Mapping::new()),
                Node::Mapping(entries) => Value::Object(
                    entries
                        .into_iter()
                        .map(|(key, slot)| {
                            let value = match slot {
                                Slot::Scalar(value) => value,
                                Slot::Node(child) => std::mem::take(&mut built[child]),
                            };
                            (key, value)
                        })
                        .collect(),
                ),
                Node::ScalarList(items) => Value::Array(items),
                Node::Table { rows, .. } => {
                    Value::Array(rows.into_iter().map(Value::Object).collect())
                }
            };
            built[id] = value;
        }

        match std::mem::take(&mut built[ROOT]) {
            Value::Object(map) => map,
            _ => Mapping::new(),
        }
    }
}

/// Count leading whitespace of a line.
fn count_indent(line: &str) -> usize {
    line.len() - line.trim_start().len()
}
