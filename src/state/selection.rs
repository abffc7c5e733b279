/// The point and file the user is about to upload
///
/// Owns the single active `Point` and `StagedFile`. Asynchronous results
/// that target them (reverse lookup labels, rendered previews, upload
/// completions) carry the ticket of the selection they were started for and
/// are dropped if the selection has moved on.

use iced::widget::image::Handle;
use thiserror::Error;

use super::data::{Point, StagedFile};
use super::reload::{Counter, Ticket};
use crate::error::GatewayError;

/// Problems the user can fix before anything is sent to the server
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Please select an image file.")]
    NotAnImage { mime: String },

    #[error("Please select both an image and a location.")]
    Incomplete,

    #[error("An upload is already in progress.")]
    UploadInFlight,
}

/// Everything needed for `POST /api/upload`
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub point: Point,
    pub file: StagedFile,
    /// Ticket of the staged file, so completion only clears this file
    pub file_ticket: Ticket,
}

#[derive(Debug, Default)]
pub struct Selection {
    point: Option<(Point, Ticket)>,
    point_tickets: Counter,
    staged: Option<(StagedFile, Ticket)>,
    file_tickets: Counter,
    preview: Option<Handle>,
    uploading: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current point. The returned ticket identifies this
    /// selection for a later `set_reverse_lookup_label`.
    pub fn select_point(&mut self, latitude: f64, longitude: f64, label: Option<String>) -> Ticket {
        let ticket = self.point_tickets.next();
        self.point = Some((Point::new(latitude, longitude, label), ticket));
        ticket
    }

    /// Apply a reverse lookup result. Returns false when the point it was
    /// requested for is no longer selected.
    pub fn set_reverse_lookup_label(&mut self, ticket: Ticket, label: String) -> bool {
        match &mut self.point {
            Some((point, current)) if *current == ticket => {
                point.label = label;
                true
            }
            _ => false,
        }
    }

    pub fn point(&self) -> Option<&Point> {
        self.point.as_ref().map(|(point, _)| point)
    }

    /// Stage a file for upload. Non-image files are refused and leave the
    /// slot empty. On success the returned ticket keys the preview render.
    pub fn stage_file(&mut self, file: StagedFile) -> Result<Ticket, ValidationError> {
        if !file.is_image() {
            self.clear_staged_file();
            return Err(ValidationError::NotAnImage { mime: file.mime });
        }

        let ticket = self.file_tickets.next();
        self.staged = Some((file, ticket));
        self.preview = None;
        Ok(ticket)
    }

    /// Attach a rendered preview if it still belongs to the staged file
    pub fn set_preview(&mut self, ticket: Ticket, preview: Handle) -> bool {
        match &self.staged {
            Some((_, current)) if *current == ticket => {
                self.preview = Some(preview);
                true
            }
            _ => false,
        }
    }

    pub fn clear_staged_file(&mut self) {
        self.staged = None;
        self.preview = None;
        // Invalidate previews still being rendered
        self.file_tickets.next();
    }

    pub fn staged_file(&self) -> Option<&StagedFile> {
        self.staged.as_ref().map(|(file, _)| file)
    }

    pub fn preview(&self) -> Option<&Handle> {
        self.preview.as_ref()
    }

    pub fn can_upload(&self) -> bool {
        self.point.is_some() && self.staged.is_some()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    /// Whether the upload button should accept a press
    pub fn upload_enabled(&self) -> bool {
        self.can_upload() && !self.uploading
    }

    /// Package the point and file for sending and mark the upload in flight
    pub fn begin_upload(&mut self) -> Result<UploadRequest, ValidationError> {
        if self.uploading {
            return Err(ValidationError::UploadInFlight);
        }
        let (Some((point, _)), Some((file, file_ticket))) = (&self.point, &self.staged) else {
            return Err(ValidationError::Incomplete);
        };

        let request = UploadRequest {
            point: point.clone(),
            file: file.clone(),
            file_ticket: *file_ticket,
        };
        self.uploading = true;
        Ok(request)
    }

    /// Settle an upload. On success the uploaded file is unstaged; on failure
    /// it stays so the user can retry, and the message to show is returned.
    pub fn finish_upload(
        &mut self,
        file_ticket: Ticket,
        result: Result<(), GatewayError>,
    ) -> Result<(), String> {
        self.uploading = false;

        match result {
            Ok(()) => {
                let still_staged = matches!(&self.staged, Some((_, current)) if *current == file_ticket);
                if still_staged {
                    self.clear_staged_file();
                }
                Ok(())
            }
            Err(GatewayError::Server(message)) => Err(message),
            Err(err) => Err(format!("Upload failed: {err}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg(name: &str) -> StagedFile {
        StagedFile {
            filename: name.to_string(),
            mime: "image/jpeg".to_string(),
            bytes: vec![0xFF, 0xD8, 0xFF, 0xD9],
        }
    }

    fn pdf() -> StagedFile {
        StagedFile {
            filename: "doc.pdf".to_string(),
            mime: "application/pdf".to_string(),
            bytes: b"%PDF-1.7".to_vec(),
        }
    }

    #[test]
    fn test_non_image_is_rejected() {
        let mut selection = Selection::new();
        selection.select_point(37.0, -122.0, None);

        let result = selection.stage_file(pdf());

        assert!(matches!(result, Err(ValidationError::NotAnImage { .. })));
        assert!(selection.staged_file().is_none());
        assert!(!selection.can_upload());
    }

    #[test]
    fn test_rejected_file_replaces_previous() {
        let mut selection = Selection::new();
        selection.select_point(37.0, -122.0, None);
        selection.stage_file(jpeg("a.jpg")).unwrap();
        assert!(selection.can_upload());

        let _ = selection.stage_file(pdf());
        assert!(!selection.can_upload());
    }

    #[test]
    fn test_can_upload_needs_point_and_file() {
        let mut selection = Selection::new();
        assert!(!selection.can_upload());

        selection.stage_file(jpeg("a.jpg")).unwrap();
        assert!(!selection.can_upload());

        selection.select_point(37.0, -122.0, Some("Test Site".to_string()));
        assert!(selection.can_upload());

        selection.clear_staged_file();
        assert!(!selection.can_upload());
    }

    #[test]
    fn test_select_point_replaces_wholesale() {
        let mut selection = Selection::new();
        selection.select_point(1.0, 2.0, Some("First".to_string()));
        selection.select_point(3.0, 4.0, None);

        let point = selection.point().unwrap();
        assert_eq!(point.latitude, 3.0);
        assert_eq!(point.label, "Custom location");
    }

    #[test]
    fn test_late_reverse_lookup_is_discarded() {
        let mut selection = Selection::new();
        let first = selection.select_point(1.0, 2.0, None);
        let second = selection.select_point(3.0, 4.0, Some("Searched place".to_string()));

        assert!(!selection.set_reverse_lookup_label(first, "Stale street".to_string()));
        assert_eq!(selection.point().unwrap().label, "Searched place");

        assert!(selection.set_reverse_lookup_label(second, "Fresh street".to_string()));
        assert_eq!(selection.point().unwrap().label, "Fresh street");
    }

    #[test]
    fn test_stale_preview_is_discarded() {
        let mut selection = Selection::new();
        let first = selection.stage_file(jpeg("a.jpg")).unwrap();
        let second = selection.stage_file(jpeg("b.jpg")).unwrap();
        let handle = Handle::from_rgba(1, 1, vec![0, 0, 0, 255]);

        assert!(!selection.set_preview(first, handle.clone()));
        assert!(selection.preview().is_none());
        assert!(selection.set_preview(second, handle));
        assert!(selection.preview().is_some());
    }

    #[test]
    fn test_upload_success_clears_file() {
        let mut selection = Selection::new();
        selection.select_point(37.0, -122.0, Some("Test Site".to_string()));
        selection.stage_file(jpeg("a.jpg")).unwrap();

        let request = selection.begin_upload().unwrap();
        assert_eq!(request.point.label, "Test Site");
        assert!(!selection.upload_enabled());
        assert_eq!(selection.begin_upload().unwrap_err(), ValidationError::UploadInFlight);

        assert!(selection.finish_upload(request.file_ticket, Ok(())).is_ok());
        assert!(selection.staged_file().is_none());
        assert!(selection.point().is_some());
        assert!(!selection.is_uploading());
    }

    #[test]
    fn test_upload_failure_keeps_file() {
        let mut selection = Selection::new();
        selection.select_point(37.0, -122.0, None);
        selection.stage_file(jpeg("a.jpg")).unwrap();

        let request = selection.begin_upload().unwrap();
        let message = selection
            .finish_upload(request.file_ticket, Err(GatewayError::Server("File too large (max 16MB)".to_string())))
            .unwrap_err();

        assert_eq!(message, "File too large (max 16MB)");
        assert!(selection.staged_file().is_some());
        assert!(selection.upload_enabled());
    }

    #[test]
    fn test_upload_success_keeps_newer_file() {
        let mut selection = Selection::new();
        selection.select_point(37.0, -122.0, None);
        selection.stage_file(jpeg("a.jpg")).unwrap();
        let request = selection.begin_upload().unwrap();

        // User picks another file while the first one is still uploading
        selection.stage_file(jpeg("b.jpg")).unwrap();
        selection.finish_upload(request.file_ticket, Ok(())).unwrap();

        assert_eq!(selection.staged_file().unwrap().filename, "b.jpg");
    }

    #[derive(Debug)]
    enum Step {
        Select,
        StageImage,
        StagePdf,
        Clear,
    }

    #[test]
    fn test_can_upload_tracks_latest_actions() {
        use Step::*;

        let sequences: &[&[Step]] = &[
            &[],
            &[Select],
            &[StageImage],
            &[Select, StageImage],
            &[StageImage, Select],
            &[Select, StagePdf],
            &[Select, StageImage, StagePdf],
            &[Select, StagePdf, StageImage],
            &[Select, StageImage, Clear],
            &[StageImage, Clear, Select],
            &[Select, StageImage, Clear, StageImage],
            &[StagePdf, Select, Select],
            &[StageImage, StagePdf, Clear, Select, StageImage],
        ];

        for steps in sequences {
            let mut selection = Selection::new();
            let mut has_point = false;
            let mut latest_is_image = false;

            for step in steps.iter() {
                match step {
                    Select => {
                        selection.select_point(37.0, -122.0, None);
                        has_point = true;
                    }
                    StageImage => {
                        selection.stage_file(jpeg("a.jpg")).unwrap();
                        latest_is_image = true;
                    }
                    StagePdf => {
                        assert!(selection.stage_file(pdf()).is_err());
                        latest_is_image = false;
                    }
                    Clear => {
                        selection.clear_staged_file();
                        latest_is_image = false;
                    }
                }
            }

            assert_eq!(
                selection.can_upload(),
                has_point && latest_is_image,
                "after {steps:?}"
            );
        }
    }

    #[test]
    fn test_incomplete_upload_refused() {
        let mut selection = Selection::new();
        selection.stage_file(jpeg("a.jpg")).unwrap();
        assert_eq!(selection.begin_upload().unwrap_err(), ValidationError::Incomplete);
        assert!(!selection.is_uploading());
    }
}
