// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! JSON-lines action scripts.
//!
//! ```text
//! {"channel": "trailing", "action": {"type": "filterData", "payload": {"searchTerm": "par"}}}
//! {"wait": "300ms"}
//! {"action": {"type": "selectAll"}}
//! ```
//!
//! `channel` defaults to immediate. Blank lines and `#` comments are skipped.
//! Actions with a type no page knows decode to [`Action::Unsupported`].

use crate::config::parse_duration;
use anyhow::{Context, Result, anyhow, bail};
use gridstate_app::{Action, ActionKind};
use gridstate_controller::{Channel, ManualClock, PageController};
use serde_json::Value;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Submit { channel: Channel, action: Action },
    Wait(Duration),
}

pub fn parse_script(raw: &str) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    for (index, line) in raw.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let step = parse_step(line).with_context(|| format!("script line {}", index + 1))?;
        steps.push(step);
    }
    Ok(steps)
}

fn parse_step(line: &str) -> Result<Step> {
    let value: Value = serde_json::from_str(line).context("parse JSON")?;
    if let Some(wait) = value.get("wait") {
        let raw = wait
            .as_str()
            .ok_or_else(|| anyhow!("\"wait\" must be a duration string such as \"300ms\""))?;
        return Ok(Step::Wait(parse_duration(raw)?));
    }

    let channel = match value.get("channel") {
        None => Channel::default(),
        Some(raw) => {
            let name = raw
                .as_str()
                .ok_or_else(|| anyhow!("\"channel\" must be a string"))?;
            Channel::parse(name).ok_or_else(|| {
                anyhow!("unknown channel {name:?}; use one of: immediate, trailing, leading")
            })?
        }
    };
    let action = value
        .get("action")
        .ok_or_else(|| anyhow!("expected an \"action\" or a \"wait\" entry"))?;
    Ok(Step::Submit {
        channel,
        action: decode_action(action)?,
    })
}

fn decode_action(value: &Value) -> Result<Action> {
    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        bail!("action needs a string \"type\"");
    };
    if ActionKind::parse(kind).is_none() {
        tracing::debug!(action = kind, "unknown action type");
        return Ok(Action::Unsupported);
    }
    serde_json::from_value(value.clone()).with_context(|| format!("decode {kind} action"))
}

/// Run every step against the controller. Waits move the clock and let due
/// trailing actions fire. Returns the number of page events produced.
pub fn replay(
    controller: &mut PageController<ManualClock>,
    clock: &ManualClock,
    steps: Vec<Step>,
) -> usize {
    let mut events = 0;
    for step in steps {
        events += match step {
            Step::Submit { channel, action } => {
                tracing::debug!(
                    channel = channel.as_str(),
                    action = action.kind().as_str(),
                    "submit"
                );
                controller.submit_on(channel, action).len()
            }
            Step::Wait(duration) => {
                clock.advance(duration);
                controller.poll().len()
            }
        };
    }
    events
}

#[cfg(test)]
mod tests {
    use super::{Step, parse_script, replay};
    use anyhow::Result;
    use gridstate_app::{Action, MemoryCollection, MemoryStore, PageId};
    use gridstate_controller::{Channel, ManualClock, PageController};
    use gridstate_testkit::invoice_lines;
    use std::rc::Rc;
    use std::time::Duration;

    #[test]
    fn script_lines_decode_to_steps() -> Result<()> {
        let steps = parse_script(
            r#"
            # type-ahead
            {"channel": "trailing", "action": {"type": "filterData", "payload": {"searchTerm": "par"}}}
            {"wait": "300ms"}
            {"action": {"type": "selectAll"}}
            "#,
        )?;
        assert_eq!(
            steps,
            vec![
                Step::Submit {
                    channel: Channel::Trailing,
                    action: Action::FilterData {
                        search_term: "par".to_owned(),
                    },
                },
                Step::Wait(Duration::from_millis(300)),
                Step::Submit {
                    channel: Channel::Immediate,
                    action: Action::SelectAll,
                },
            ]
        );
        Ok(())
    }

    #[test]
    fn unknown_action_types_become_unsupported() -> Result<()> {
        let steps = parse_script(r#"{"action": {"type": "launchRocket", "payload": {"x": 1}}}"#)?;
        assert_eq!(
            steps,
            vec![Step::Submit {
                channel: Channel::Immediate,
                action: Action::Unsupported,
            }]
        );
        Ok(())
    }

    #[test]
    fn bad_lines_report_their_line_number() {
        let error = parse_script("{\"wait\": \"300ms\"}\n{\"channel\": \"sometimes\", \"action\": {}}")
            .expect_err("unknown channel should fail");
        let message = format!("{error:#}");
        assert!(message.contains("script line 2"));
        assert!(message.contains("unknown channel"));

        let error = parse_script(r#"{"action": {"type": "sortData", "payload": {}}}"#)
            .expect_err("missing sortBy should fail");
        assert!(format!("{error:#}").contains("decode sortData action"));
    }

    #[test]
    fn replay_applies_the_last_trailing_action_after_a_wait() -> Result<()> {
        let clock = ManualClock::new();
        let mut controller = PageController::mount_with_clock(
            PageId::CustomerInvoice,
            Rc::new(MemoryCollection::new(invoice_lines())),
            Rc::new(MemoryStore::default()),
            None,
            clock.clone(),
        );
        let steps = parse_script(
            r#"
            {"channel": "trailing", "action": {"type": "filterData", "payload": {"searchTerm": "a"}}}
            {"channel": "trailing", "action": {"type": "filterData", "payload": {"searchTerm": "amox"}}}
            {"wait": "250ms"}
            {"channel": "leading", "action": {"type": "selectAll"}}
            {"channel": "leading", "action": {"type": "deselectAll"}}
            "#,
        )?;

        let events = replay(&mut controller, &clock, steps);
        let snapshot = controller.snapshot();
        assert!(events > 0);
        assert_eq!(snapshot.search_term, "amox");
        assert_eq!(snapshot.rows.len(), 1);
        assert!(snapshot.all_selected, "second leading tap is dropped");
        Ok(())
    }
}
