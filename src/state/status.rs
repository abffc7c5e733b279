/// Transient status line shown under the upload controls
///
/// Each message gets a ticket; the auto-clear timer only removes the message
/// it was started for.

use super::reload::{Counter, Ticket};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Default)]
pub struct StatusLine {
    current: Option<(String, StatusKind)>,
    tickets: Counter,
}

impl StatusLine {
    /// Show a message, replacing any previous one. The returned ticket is
    /// handed back to `expire` when the display interval ends.
    pub fn show(&mut self, message: impl Into<String>, kind: StatusKind) -> Ticket {
        self.current = Some((message.into(), kind));
        self.tickets.next()
    }

    pub fn expire(&mut self, ticket: Ticket) {
        if self.tickets.is_current(ticket) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<(&str, StatusKind)> {
        self.current.as_ref().map(|(text, kind)| (text.as_str(), *kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expire_clears_message() {
        let mut status = StatusLine::default();
        let ticket = status.show("Uploading image...", StatusKind::Info);
        status.expire(ticket);
        assert!(status.current().is_none());
    }

    #[test]
    fn test_old_timer_keeps_newer_message() {
        let mut status = StatusLine::default();
        let old = status.show("Uploading image...", StatusKind::Info);
        status.show("Image uploaded successfully!", StatusKind::Success);

        status.expire(old);
        assert_eq!(
            status.current(),
            Some(("Image uploaded successfully!", StatusKind::Success))
        );
    }
}
