use crate::world::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Open,
    Close,
    Lock,
    Take,
    Drop,
    Put,
    Examine,
    Look,
    Inventory,
    Move,
    Score,
}

impl Verb {
    /// Informational verbs leave the move counter alone.
    pub fn counts_as_move(self) -> bool {
        !matches!(
            self,
            Verb::Examine | Verb::Look | Verb::Inventory | Verb::Score
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verb::Open => "open",
            Verb::Close => "close",
            Verb::Lock => "lock",
            Verb::Take => "take",
            Verb::Drop => "drop",
            Verb::Put => "put",
            Verb::Examine => "examine",
            Verb::Look => "look",
            Verb::Inventory => "inventory",
            Verb::Move => "go",
            Verb::Score => "score",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preposition {
    With,
    In,
    On,
    From,
}

impl Preposition {
    fn parse(word: &str) -> Option<Preposition> {
        match word {
            "with" => Some(Preposition::With),
            "in" | "into" | "inside" => Some(Preposition::In),
            "on" | "onto" => Some(Preposition::On),
            "from" => Some(Preposition::From),
            _ => None,
        }
    }

    /// "in" and "on" both mean "place inside a container".
    pub fn is_placement(self) -> bool {
        matches!(self, Preposition::In | Preposition::On)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modifier {
    pub prep: Preposition,
    pub object: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub verb: Verb,
    pub object: Option<String>,
    pub modifier: Option<Modifier>,
    pub direction: Option<Direction>,
}

impl Command {
    fn new(verb: Verb) -> Self {
        Command {
            verb,
            object: None,
            modifier: None,
            direction: None,
        }
    }

    pub fn modifier_with(&self, prep: Preposition) -> Option<&str> {
        match &self.modifier {
            Some(m) if m.prep == prep => Some(m.object.as_str()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Empty,
    Command(Command),
    /// Leading word is not a known verb; the normalized words are kept for
    /// custom interactions.
    Unknown(Vec<String>),
}

const ARTICLES: &[&str] = &["the", "a", "an"];

/// Two-word verb phrases, checked before single words.
const PHRASES: &[(&str, &str, Verb)] = &[
    ("pick", "up", Verb::Take),
    ("put", "down", Verb::Drop),
    ("look", "at", Verb::Examine),
    ("look", "in", Verb::Examine),
    ("look", "inside", Verb::Examine),
    ("look", "around", Verb::Look),
];

fn verb_for(word: &str) -> Option<Verb> {
    let verb = match word {
        "take" | "get" | "grab" | "carry" => Verb::Take,
        "drop" | "discard" => Verb::Drop,
        "put" | "place" | "insert" => Verb::Put,
        "open" | "unlock" => Verb::Open,
        "close" | "shut" => Verb::Close,
        "lock" => Verb::Lock,
        "examine" | "x" | "inspect" | "study" => Verb::Examine,
        "look" | "l" => Verb::Look,
        "inventory" | "inv" | "i" => Verb::Inventory,
        "go" | "walk" | "move" | "travel" | "head" | "run" | "climb" => Verb::Move,
        "score" => Verb::Score,
        _ => return None,
    };
    Some(verb)
}

/// Lowercase, drop punctuation, split on whitespace.
pub fn normalize(input: &str) -> Vec<String> {
    input
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn strip_articles(words: &[String]) -> Vec<String> {
    words
        .iter()
        .filter(|w| !ARTICLES.contains(&w.as_str()))
        .cloned()
        .collect()
}

fn join_phrase(words: &[String]) -> Option<String> {
    let words = strip_articles(words);
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

pub fn parse(input: &str) -> Parsed {
    let words = normalize(input);
    let Some(first) = words.first() else {
        return Parsed::Empty;
    };

    // Bare direction words: "n", "up", "enter"
    if verb_for(first).is_none() {
        if let Some(dir) = Direction::parse(first) {
            let mut cmd = Command::new(Verb::Move);
            cmd.direction = Some(dir);
            return Parsed::Command(cmd);
        }
    }

    let phrase = words.get(1).and_then(|second| {
        PHRASES
            .iter()
            .find(|(a, b, _)| *a == first.as_str() && *b == second.as_str())
            .map(|(_, _, verb)| *verb)
    });

    let (verb, rest) = match phrase {
        Some(verb) => (verb, &words[2..]),
        None => match verb_for(first) {
            Some(verb) => (verb, &words[1..]),
            None => return Parsed::Unknown(words),
        },
    };

    let mut cmd = Command::new(verb);

    if verb == Verb::Move {
        cmd.direction = match rest.first() {
            Some(word) => Direction::parse(word),
            None if first == "climb" => Some(Direction::Up),
            None => None,
        };
        cmd.object = join_phrase(rest);
        return Parsed::Command(cmd);
    }

    // "look north" is not a thing; anything after a bare look is ignored.
    if verb == Verb::Look || verb == Verb::Inventory || verb == Verb::Score {
        return Parsed::Command(cmd);
    }

    // Split the remainder on its first preposition. A preposition in the
    // leading position belongs to the object ("take from box" is malformed
    // and falls through as an object).
    let split = rest
        .iter()
        .enumerate()
        .skip(1)
        .find_map(|(idx, w)| Preposition::parse(w).map(|p| (idx, p)));

    match split {
        Some((idx, prep)) => {
            cmd.object = join_phrase(&rest[..idx]);
            cmd.modifier = join_phrase(&rest[idx + 1..]).map(|object| Modifier { prep, object });
        }
        None => cmd.object = join_phrase(rest),
    }

    Parsed::Command(cmd)
}
