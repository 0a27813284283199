use crate::form::SearchForm;

/// The last submitted search, kept so pagination can replay the same blog and
/// query without the user typing them again. Last write wins.
#[derive(Debug, Clone, Default)]
pub struct SearchSession {
    last: Option<SearchForm>,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, form: &SearchForm) {
        self.last = Some(form.clone());
    }

    pub fn last(&self) -> Option<&SearchForm> {
        self.last.as_ref()
    }

    /// Copies blog and query (and the page, when given) from the last search
    /// onto `form`. Returns false when nothing has been searched yet.
    pub fn restore_into(&self, form: &mut SearchForm, page: Option<u32>) -> bool {
        let Some(last) = &self.last else { return false };
        form.blog = last.blog.clone();
        form.query = last.query.clone();
        if let Some(page) = page {
            form.page = page.max(1);
        }
        true
    }
}
