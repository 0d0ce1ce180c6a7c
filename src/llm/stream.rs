//! Tool-call fragment reassembly
//!
//! Streamed completions deliver tool calls as interleaved fragments
//! keyed by index. The accumulator buckets them and hands back whole
//! calls in index order once the stream ends.

use std::collections::BTreeMap;

use crate::llm::traits::ToolCallChunk;

/// A tool call reassembled from streamed fragments
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolCallFragment {
    /// Concatenated function name pieces
    pub name: String,
    /// Concatenated JSON argument text
    pub arguments: String,
}

/// Accumulates tool-call fragments across a whole stream
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    calls: BTreeMap<u32, ToolCallFragment>,
}

impl ToolCallAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one fragment into its call's bucket
    pub fn absorb(&mut self, chunk: &ToolCallChunk) {
        let call = self.calls.entry(chunk.index).or_default();

        if let Some(ref name) = chunk.name {
            call.name.push_str(name);
        }
        if let Some(ref arguments) = chunk.arguments {
            call.arguments.push_str(arguments);
        }
    }

    /// Fold every fragment of a delta into the buckets
    pub fn absorb_all(&mut self, chunks: &[ToolCallChunk]) {
        for chunk in chunks {
            self.absorb(chunk);
        }
    }

    /// Number of distinct calls seen so far
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether any fragment has been absorbed
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Drain the reassembled calls in ascending index order
    pub fn into_calls(self) -> Vec<(u32, ToolCallFragment)> {
        self.calls.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(index: u32, name: Option<&str>, arguments: Option<&str>) -> ToolCallChunk {
        ToolCallChunk {
            index,
            name: name.map(str::to_string),
            arguments: arguments.map(str::to_string),
        }
    }

    #[test]
    fn test_fragments_concatenate() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&chunk(0, Some("update"), None));
        acc.absorb(&chunk(0, Some("Artifact"), Some("{\"file")));
        acc.absorb(&chunk(0, None, Some("name\":\"a.md\"}")));

        let calls = acc.into_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, 0);
        assert_eq!(calls[0].1.name, "updateArtifact");
        assert_eq!(calls[0].1.arguments, "{\"filename\":\"a.md\"}");
    }

    #[test]
    fn test_interleaved_indices_stay_separate() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&chunk(0, Some("updateArtifact"), None));
        acc.absorb(&chunk(1, Some("callAgent"), None));
        acc.absorb(&chunk(0, None, Some("{\"a\":1}")));
        acc.absorb(&chunk(1, None, Some("{\"b\":2}")));

        let calls = acc.into_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1.name, "updateArtifact");
        assert_eq!(calls[0].1.arguments, "{\"a\":1}");
        assert_eq!(calls[1].1.name, "callAgent");
        assert_eq!(calls[1].1.arguments, "{\"b\":2}");
    }

    #[test]
    fn test_drain_is_index_ordered() {
        let mut acc = ToolCallAccumulator::new();
        acc.absorb(&chunk(2, Some("c"), None));
        acc.absorb(&chunk(0, Some("a"), None));
        acc.absorb(&chunk(1, Some("b"), None));

        let names: Vec<String> = acc.into_calls().into_iter().map(|(_, c)| c.name).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_accumulator() {
        let acc = ToolCallAccumulator::new();
        assert!(acc.is_empty());
        assert_eq!(acc.len(), 0);
        assert!(acc.into_calls().is_empty());
    }
}
