use std::collections::HashMap;

#[derive(Debug, Default)]
struct TrieNode {
    children: HashMap<char, TrieNode>,
    terminal: bool,
}

/// Character-keyed prefix tree over admitted names
///
/// All queries walk at most `s.chars().count()` nodes.
#[derive(Debug, Default)]
pub struct PrefixTrie {
    root: TrieNode,
    len: usize,
}

impl PrefixTrie {
    /// Creates an empty trie
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a word, returning `true` if it was not present before
    pub fn insert(&mut self, word: &str) -> bool {
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.children.entry(c).or_default();
        }

        if node.terminal {
            return false;
        }
        node.terminal = true;
        self.len += 1;
        true
    }

    /// Returns `true` if exactly `word` was inserted
    pub fn contains(&self, word: &str) -> bool {
        self.find(word).is_some_and(|node| node.terminal)
    }

    /// Returns `true` if some inserted word starts with (or equals) `prefix`
    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.find(prefix)
            .is_some_and(|node| node.terminal || !node.children.is_empty())
    }

    /// Number of distinct words inserted
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn find(&self, s: &str) -> Option<&TrieNode> {
        let mut node = &self.root;
        for c in s.chars() {
            node = node.children.get(&c)?;
        }
        Some(node)
    }
}
