//! Console implementation of the `OutcomeNotifier` port
//!
//! Every message is printed as `[player] text`. Applying an outcome also
//! performs the night skip on the simulated worlds.

use crate::output::messages::Messages;
use colored::Colorize;
use sleepvote_application::{OutcomeNotifier, PartitionRegistry};
use sleepvote_domain::{ParticipantId, PartitionId, VoteOutcome};
use sleepvote_infrastructure::InMemoryWorlds;
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::warn;

pub struct ConsoleNotifier {
    worlds: Arc<InMemoryWorlds>,
    messages: Arc<Messages>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleNotifier {
    /// Notifier printing to stdout
    pub fn new(worlds: Arc<InMemoryWorlds>, messages: Arc<Messages>) -> Self {
        Self::with_writer(worlds, messages, std::io::stdout())
    }

    pub fn with_writer(
        worlds: Arc<InMemoryWorlds>,
        messages: Arc<Messages>,
        writer: impl Write + Send + 'static,
    ) -> Self {
        Self {
            worlds,
            messages,
            out: Mutex::new(Box::new(writer)),
        }
    }

    fn send(&self, recipient: &ParticipantId, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        // stdout going away is not worth failing a vote over
        let _ = writeln!(out, "{} {}", format!("[{recipient}]").dimmed(), text);
        let _ = out.flush();
    }
}

impl OutcomeNotifier for ConsoleNotifier {
    fn prompt_vote(&self, participant: &ParticipantId, partition: &PartitionId) {
        let text = format!(
            "{}{} | {}",
            self.messages.prompt(partition).yellow(),
            self.messages.get("vote.yes_button").green().bold(),
            self.messages.get("vote.no_button").red().bold()
        );
        self.send(participant, &text);
    }

    fn announce_result(
        &self,
        participant: &ParticipantId,
        outcome: &VoteOutcome,
        partition: &PartitionId,
    ) {
        let text = self.messages.result(outcome, partition);
        let text = if outcome.passed {
            text.green()
        } else {
            text.red()
        };
        self.send(participant, &text.to_string());
    }

    fn apply_outcome(&self, partition: &PartitionId) {
        if let Err(e) = self.worlds.skip_to_morning(partition) {
            warn!(%partition, "Night skip failed: {}", e);
            return;
        }
        let text = self.messages.get("sleep.night_skipped");
        for occupant in self.worlds.occupants(partition) {
            self.send(&occupant, &text.cyan().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sleepvote_domain::{Dimension, GameMode, PassThreshold, TimeOfDay, VoteTally};

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn text(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn setup() -> (Arc<InMemoryWorlds>, ConsoleNotifier, SharedBuffer) {
        let worlds = Arc::new(InMemoryWorlds::new());
        worlds.add_world("world", Dimension::Overworld).unwrap();
        let buffer = SharedBuffer::default();
        let notifier = ConsoleNotifier::with_writer(
            Arc::clone(&worlds),
            Arc::new(Messages::english()),
            buffer.clone(),
        );
        (worlds, notifier, buffer)
    }

    #[test]
    fn test_prompt_names_world_and_buttons() {
        let (_, notifier, buffer) = setup();
        notifier.prompt_vote(&ParticipantId::new("alex"), &PartitionId::new("world"));

        let text = buffer.text();
        assert!(text.contains("alex"));
        assert!(text.contains("Vote to skip the night in world"));
        assert!(text.contains("[Yes]"));
        assert!(text.contains("[No]"));
    }

    #[test]
    fn test_announce_result() {
        let (_, notifier, buffer) = setup();
        let outcome = VoteTally::new(0, 2).decide(PassThreshold::default());
        notifier.announce_result(
            &ParticipantId::new("alex"),
            &outcome,
            &PartitionId::new("world"),
        );
        assert!(buffer.text().contains("Vote failed in world with 0% yes."));
    }

    #[test]
    fn test_apply_outcome_skips_night() {
        let (worlds, notifier, buffer) = setup();
        let world = PartitionId::new("world");
        worlds.set_time(&world, TimeOfDay::new(18_000)).unwrap();
        worlds.set_weather(&world, true, false).unwrap();
        worlds
            .join(&ParticipantId::new("alex"), &world, GameMode::Survival)
            .unwrap();

        notifier.apply_outcome(&world);

        let state = worlds.world(&world).unwrap();
        assert_eq!(state.time, TimeOfDay::MORNING);
        assert!(!state.storm);
        assert!(buffer.text().contains("The night has been skipped."));
    }
}
