use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use marquee_config::{InteractionConfig, SiteControllers};
use marquee_core::{
    InteractionError, Notice, Span, TimerDriven, VirtualTimeProvider,
    drive_until, menu_update, rotator_update,
};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::script::{
    Command, ContactAction, HeaderAction, NoticeAction, RevealAction, Script,
};

/// Knobs for a replay run.
#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    /// Keep the clock running until at least this far into the run so
    /// pending timers get to fire after the last event.
    pub until: Option<Duration>,
}

#[derive(Serialize)]
struct Line<'a> {
    at_ms: u64,
    target: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

struct Session<'w, W: Write> {
    clock: VirtualTimeProvider,
    site: SiteControllers,
    last: BTreeMap<&'static str, Value>,
    out: &'w mut W,
    lines: usize,
}

/// Run `script` against controllers built from `config` and write one JSON
/// line per state change to `out`. Returns the number of lines written.
pub fn replay<W: Write>(
    script: &Script,
    config: &InteractionConfig,
    options: &ReplayOptions,
    out: &mut W,
) -> anyhow::Result<usize> {
    let clock = VirtualTimeProvider::new();
    let mut site = SiteControllers::build(
        config,
        Arc::new(clock.clone()),
        script.hero_slides,
        script.testimonials,
    )?;
    for section in &script.sections {
        site.register_section(
            section.key.clone(),
            Span::new(section.top, section.height),
        );
    }

    let mut session = Session {
        clock,
        site,
        last: BTreeMap::new(),
        out,
        lines: 0,
    };
    session.record_initial()?;

    for event in script.ordered_events() {
        session.advance_to(Duration::from_millis(event.at_ms))?;
        debug!(at_ms = event.at_ms, target = event.command.target(), "event");
        session.apply(&event.command)?;
    }

    let end_ms = options
        .until
        .map(|until| until.as_millis() as u64)
        .unwrap_or(0)
        .max(script.last_event_ms());
    session.advance_to(Duration::from_millis(end_ms))?;

    let disposed = session.site.dispose();
    debug!(disposed, "replay finished, controllers disposed");
    Ok(session.lines)
}

impl<W: Write> Session<'_, W> {
    fn elapsed_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }

    fn snapshots(&self) -> anyhow::Result<[(&'static str, Value); 5]> {
        Ok([
            ("header", serde_json::to_value(self.site.header_snapshot())?),
            ("hero", serde_json::to_value(self.site.hero_snapshot())?),
            (
                "testimonials",
                serde_json::to_value(self.site.testimonials_snapshot())?,
            ),
            ("contact", serde_json::to_value(self.site.contact_snapshot())?),
            ("notice", serde_json::to_value(self.site.notice_snapshot())?),
        ])
    }

    fn record_initial(&mut self) -> anyhow::Result<()> {
        for (target, value) in self.snapshots()? {
            self.write(target, Some(&value), None)?;
            self.last.insert(target, value);
        }
        Ok(())
    }

    fn emit_changes(&mut self) -> anyhow::Result<()> {
        for (target, value) in self.snapshots()? {
            if self.last.get(target) == Some(&value) {
                continue;
            }
            self.write(target, Some(&value), None)?;
            self.last.insert(target, value);
        }
        Ok(())
    }

    /// Fire every deadline up to `offset`, one deadline at a time so each
    /// expiry gets its own output line.
    fn advance_to(&mut self, offset: Duration) -> anyhow::Result<()> {
        let target = self.clock.at(offset);
        while let Some(deadline) = self.next_deadline_before(target) {
            if drive_until(&self.clock, &mut self.site.timers(), deadline) == 0 {
                break;
            }
            self.emit_changes()?;
        }
        drive_until(&self.clock, &mut self.site.timers(), target);
        self.emit_changes()
    }

    fn next_deadline_before(&mut self, target: Instant) -> Option<Instant> {
        self.site
            .timers()
            .iter()
            .filter_map(|timer| timer.next_deadline())
            .filter(|deadline| *deadline <= target)
            .min()
    }

    fn apply(&mut self, command: &Command) -> anyhow::Result<()> {
        let site = &mut self.site;
        let mut revealed = Vec::new();
        let result = match command {
            Command::Menu(message) => {
                menu_update(site.header.menu_mut(), message.clone())
            }
            Command::Hero(message) => {
                rotator_update(&mut site.hero, message.clone())
            }
            Command::Testimonials(message) => {
                rotator_update(&mut site.testimonials, message.clone())
            }
            Command::Notice(action) => match action {
                NoticeAction::Show { message, tone } => {
                    site.contact.notice_mut().show(Notice {
                        message: message.clone(),
                        tone: *tone,
                    })
                }
                NoticeAction::Dismiss => site.contact.notice_mut().dismiss(),
                NoticeAction::Dispose => site.contact.notice_mut().dispose(),
            },
            Command::Contact(action) => match action {
                ContactAction::Submit => site.contact.submit(),
                ContactAction::Fail => site.contact.fail(),
                ContactAction::Dispose => site.contact.dispose(),
            },
            Command::Header(action) => match action {
                HeaderAction::Scroll { offset_y } => {
                    site.header.set_scroll_offset(*offset_y).map(|_| ())
                }
                HeaderAction::ToggleMobile => site.header.toggle_mobile(),
                HeaderAction::ToggleSection { id } => {
                    site.header.toggle_section(id.clone())
                }
                HeaderAction::Dispose => site.header.dispose(),
            },
            Command::Reveal(RevealAction::Viewport { top, height }) => {
                revealed = site
                    .reveal
                    .update_viewport(Span::new(*top, *height));
                Ok(())
            }
        };

        for change in revealed {
            let value = serde_json::json!({
                "key": change.key,
                "revealed": change.revealed,
                "in_view": change.in_view,
            });
            self.write("reveal", Some(&value), None)?;
        }
        if let Err(err) = result {
            self.report(command.target(), err)?;
        }
        self.emit_changes()
    }

    fn report(
        &mut self,
        target: &'static str,
        err: InteractionError,
    ) -> anyhow::Result<()> {
        warn!(target_name = target, error = %err, "event rejected");
        self.write(target, None, Some(err.to_string()))
    }

    fn write(
        &mut self,
        target: &str,
        state: Option<&Value>,
        error: Option<String>,
    ) -> anyhow::Result<()> {
        let line = Line {
            at_ms: self.elapsed_ms(),
            target,
            state,
            error,
        };
        serde_json::to_writer(&mut *self.out, &line)?;
        writeln!(self.out)?;
        self.lines += 1;
        Ok(())
    }
}
