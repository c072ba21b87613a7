//! In-memory batch of book drafts staged before a single publish.

use super::{BookCondition, BookDraft, BookField};

/// Batch operation rejected locally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BatchError {
    #[error("{0} is required before adding to the batch")]
    MissingField(BookField),
    #[error("no staged book at index {index} (batch holds {len})")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("add at least one book before publishing")]
    Empty,
}

/// A current draft plus the drafts already staged.
///
/// # Examples
/// ```
/// use backend::domain::ListingBatch;
///
/// let mut batch = ListingBatch::default();
/// batch.set_title("Physics Past Papers");
/// batch.set_price("2500");
/// batch.set_description("2010 to 2023, clean copies");
/// batch.add_to_batch().expect("complete draft");
/// assert_eq!(batch.staged().len(), 1);
/// assert!(batch.draft().title.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingBatch {
    draft: BookDraft,
    staged: Vec<BookDraft>,
}

impl ListingBatch {
    #[must_use]
    pub fn draft(&self) -> &BookDraft {
        &self.draft
    }

    #[must_use]
    pub fn staged(&self) -> &[BookDraft] {
        &self.staged
    }

    pub fn set_title(&mut self, value: impl Into<String>) {
        self.draft.title = value.into();
    }

    pub fn set_author(&mut self, value: impl Into<String>) {
        self.draft.author = value.into();
    }

    pub fn set_price(&mut self, value: impl Into<String>) {
        self.draft.price = value.into();
    }

    pub fn set_condition(&mut self, value: BookCondition) {
        self.draft.condition = value;
    }

    pub fn set_subject(&mut self, value: impl Into<String>) {
        self.draft.subject = value.into();
    }

    pub fn set_description(&mut self, value: impl Into<String>) {
        self.draft.description = value.into();
    }

    pub fn set_extra_details(&mut self, value: impl Into<String>) {
        self.draft.extra_details = value.into();
    }

    /// Stage the current draft and start a blank one.
    ///
    /// Title, price and description must be filled in; otherwise nothing
    /// changes. Returns the number of staged drafts.
    pub fn add_to_batch(&mut self) -> Result<usize, BatchError> {
        if let Some(field) = self.draft.missing_required_field() {
            return Err(BatchError::MissingField(field));
        }
        self.staged.push(std::mem::take(&mut self.draft));
        Ok(self.staged.len())
    }

    /// Drop a staged draft.
    pub fn remove(&mut self, index: usize) -> Result<BookDraft, BatchError> {
        if index >= self.staged.len() {
            return Err(BatchError::IndexOutOfRange {
                index,
                len: self.staged.len(),
            });
        }
        Ok(self.staged.remove(index))
    }

    /// Everything a publish would send: the staged drafts, plus the current
    /// draft when it is filled in.
    pub fn prepare_publish(&self) -> Result<Vec<BookDraft>, BatchError> {
        let mut batch = self.staged.clone();
        if self.draft.is_filled() {
            batch.push(self.draft.clone());
        }
        if batch.is_empty() {
            return Err(BatchError::Empty);
        }
        Ok(batch)
    }

    /// Publish went through; start over.
    pub fn publish_succeeded(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn fill(batch: &mut ListingBatch, title: &str) {
        batch.set_title(title);
        batch.set_price("1500");
        batch.set_description("Good condition");
    }

    #[fixture]
    fn two_staged() -> ListingBatch {
        let mut batch = ListingBatch::default();
        fill(&mut batch, "Physics");
        batch.add_to_batch().expect("first");
        fill(&mut batch, "Chemistry");
        batch.add_to_batch().expect("second");
        batch
    }

    #[rstest]
    #[case::no_title("", "1500", "desc", BookField::Title)]
    #[case::no_price("Physics", " ", "desc", BookField::Price)]
    #[case::no_description("Physics", "1500", "", BookField::Description)]
    fn incomplete_draft_leaves_batch_untouched(
        mut two_staged: ListingBatch,
        #[case] title: &str,
        #[case] price: &str,
        #[case] description: &str,
        #[case] missing: BookField,
    ) {
        let before = two_staged.staged().to_vec();
        two_staged.set_title(title);
        two_staged.set_price(price);
        two_staged.set_description(description);

        assert_eq!(
            two_staged.add_to_batch(),
            Err(BatchError::MissingField(missing))
        );
        assert_eq!(two_staged.staged(), before.as_slice());
        assert_eq!(two_staged.draft().title, title);
    }

    #[rstest]
    fn adding_resets_draft_to_defaults(two_staged: ListingBatch) {
        assert_eq!(two_staged.staged().len(), 2);
        assert_eq!(two_staged.draft(), &BookDraft::default());
        assert_eq!(two_staged.draft().condition, BookCondition::Used);
    }

    #[rstest]
    fn filled_draft_counts_towards_publish(mut two_staged: ListingBatch) {
        two_staged.set_title("Biology");
        two_staged.set_price("3000");
        let batch = two_staged.prepare_publish().expect("publishable");
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.last().map(|b| b.title.as_str()), Some("Biology"));
    }

    #[rstest]
    fn half_filled_draft_is_left_out(mut two_staged: ListingBatch) {
        two_staged.set_title("Biology");
        let batch = two_staged.prepare_publish().expect("publishable");
        assert_eq!(batch.len(), 2);
    }

    #[rstest]
    fn empty_batch_is_rejected_locally() {
        let batch = ListingBatch::default();
        assert_eq!(batch.prepare_publish(), Err(BatchError::Empty));
    }

    #[rstest]
    fn remove_checks_bounds(mut two_staged: ListingBatch) {
        assert_eq!(
            two_staged.remove(2),
            Err(BatchError::IndexOutOfRange { index: 2, len: 2 })
        );
        let removed = two_staged.remove(0).expect("in range");
        assert_eq!(removed.title, "Physics");
        assert_eq!(two_staged.staged().len(), 1);
    }

    #[rstest]
    fn publish_success_clears_everything(mut two_staged: ListingBatch) {
        two_staged.set_title("Pending");
        two_staged.publish_succeeded();
        assert_eq!(two_staged, ListingBatch::default());
    }
}
