use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Votes on the board before the session starts.
    #[serde(default)]
    pub seed_votes: u64,
}

impl Candidate {
    pub fn new(id: &str, name: &str, tags: &[&str], seed_votes: u64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            seed_votes,
        }
    }

    /// Tags joined the way a card's `data-tags` attribute carries them.
    pub fn tag_line(&self) -> String {
        self.tags.join(", ")
    }
}

/// Ordered candidate catalogue. Order drives the grid, results rows and the
/// live-noise pool.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    pub candidates: Vec<Candidate>,
}

impl Roster {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn get(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|candidate| candidate.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.candidates.iter().map(|candidate| candidate.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}
