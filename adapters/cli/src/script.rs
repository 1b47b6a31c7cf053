use serde::Deserialize;
use serde_json::Value;

const NOTHING: &str = "{}";

/// One scripted line: each team's raw action payload.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ScriptedTurn {
    red: Option<Value>,
    blue: Option<Value>,
}

/// Per-turn action payloads read from a JSON-lines file.
///
/// Payloads stay raw so the simulation decides what a malformed action
/// means, exactly as it would for a live agent.
#[derive(Debug, Default)]
pub(crate) struct ActionScript {
    turns: Vec<(String, String)>,
}

impl ActionScript {
    /// Parses one object per non-blank line.
    pub(crate) fn parse(text: &str) -> Result<Self, serde_json::Error> {
        let mut turns = Vec::new();
        for line in text.lines().filter(|line| !line.trim().is_empty()) {
            let turn: ScriptedTurn = serde_json::from_str(line)?;
            turns.push((payload(turn.red), payload(turn.blue)));
        }
        Ok(Self { turns })
    }

    /// Number of scripted turns.
    pub(crate) fn len(&self) -> usize {
        self.turns.len()
    }

    /// Payloads for the turn; turns past the end of the script do nothing.
    pub(crate) fn turn(&self, index: usize) -> (&str, &str) {
        self.turns
            .get(index)
            .map_or((NOTHING, NOTHING), |(red, blue)| (red.as_str(), blue.as_str()))
    }
}

fn payload(value: Option<Value>) -> String {
    value.map_or_else(|| NOTHING.to_owned(), |value| value.to_string())
}
