//! Rendering seam between the controller and whatever displays the page.

use crate::api::{BlogSummary, ResultItem};
use crate::error::{ClientError, Result};
use crate::meta::MetaDisplay;
use crate::preview::Preview;
use serde::Serialize;

const TAG_BASE_URL: &str = "https://tumblr.com/blog/view";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagLink {
    pub text: String,
    pub href: String,
}

impl TagLink {
    pub fn new(blog_name: &str, tag: &str) -> Self {
        Self {
            text: tag.to_string(),
            href: format!(
                "{TAG_BASE_URL}/{}/tagged/{}",
                urlencoding::encode(blog_name),
                urlencoding::encode(tag)
            ),
        }
    }
}

/// One rendered result node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    /// Backend-rendered body, inserted verbatim.
    pub html: String,
    pub tags: Vec<TagLink>,
    pub external_href: String,
    pub blog_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub preview: Preview,
}

impl ResultView {
    pub fn from_item(item: &ResultItem) -> Self {
        Self {
            html: item.rendered.clone(),
            tags: item.tags.iter().map(|t| TagLink::new(&item.blog_name, t)).collect(),
            external_href: item.post_url.clone(),
            blog_name: item.blog_name.clone(),
            date: item.display_date(),
            preview: Preview::default(),
        }
    }

    pub fn body_style(&self) -> Option<String> {
        self.preview.body_style()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Success,
    Failure,
}

/// Text and class of the login status element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginStatus {
    pub message: String,
    pub class: StatusClass,
}

pub trait ResultRenderer {
    /// Removes every result node.
    fn clear(&mut self);

    fn append(&mut self, view: ResultView);

    fn show_meta(&mut self, display: MetaDisplay);

    fn reset_scroll(&mut self);

    fn toggle_preview(&mut self, index: usize) -> Result<Preview>;

    fn show_login_status(&mut self, status: LoginStatus);

    fn clear_login_status(&mut self);

    /// Blog choices offered next to the search form.
    fn show_blogs(&mut self, blogs: &[BlogSummary]);

    fn navigate(&mut self, location: &str);

    /// Replaces the result list with `items`, in order.
    fn render_results(&mut self, items: &[ResultItem]) {
        self.clear();
        for item in items {
            self.append(ResultView::from_item(item));
        }
    }
}

/// In-memory page: the view model handed to tool callers as JSON.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageView {
    pub location: Option<String>,
    pub login_status: Option<LoginStatus>,
    pub blogs: Vec<BlogSummary>,
    pub meta: Option<MetaDisplay>,
    pub results: Vec<ResultView>,
    pub scroll_top: u64,
}

impl PageView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag links across every result, in display order.
    pub fn tag_links(&self) -> impl Iterator<Item = &TagLink> {
        self.results.iter().flat_map(|r| r.tags.iter())
    }
}

impl ResultRenderer for PageView {
    fn clear(&mut self) {
        self.results.clear();
    }

    fn append(&mut self, view: ResultView) {
        self.results.push(view);
    }

    fn show_meta(&mut self, display: MetaDisplay) {
        self.meta = Some(display);
    }

    fn reset_scroll(&mut self) {
        self.scroll_top = 0;
    }

    fn toggle_preview(&mut self, index: usize) -> Result<Preview> {
        let len = self.results.len();
        let view = self.results.get_mut(index).ok_or(ClientError::NoSuchResult { index, len })?;
        view.preview = view.preview.toggle();
        Ok(view.preview)
    }

    fn show_login_status(&mut self, status: LoginStatus) {
        self.login_status = Some(status);
    }

    fn clear_login_status(&mut self) {
        self.login_status = None;
    }

    fn show_blogs(&mut self, blogs: &[BlogSummary]) {
        self.blogs = blogs.to_vec();
    }

    fn navigate(&mut self, location: &str) {
        self.location = Some(location.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(blog: &str, tags: &[&str]) -> ResultItem {
        ResultItem {
            rendered: format!("<p>{blog}</p>"),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            blog_name: blog.into(),
            post_url: format!("https://{blog}.tumblr.com/post/1"),
            id: None,
            timestamp: None,
            timestamp_hf: None,
        }
    }

    #[test]
    fn tags_render_in_order_across_results() {
        let mut page = PageView::new();
        page.render_results(&[item("staff", &["a", "b"]), item("staff", &["c"])]);

        let tags: Vec<_> = page.tag_links().map(|t| (t.text.as_str(), t.href.as_str())).collect();
        assert_eq!(
            tags,
            vec![
                ("a", "https://tumblr.com/blog/view/staff/tagged/a"),
                ("b", "https://tumblr.com/blog/view/staff/tagged/b"),
                ("c", "https://tumblr.com/blog/view/staff/tagged/c"),
            ]
        );
        assert_eq!(page.results[0].external_href, "https://staff.tumblr.com/post/1");
        assert_eq!(page.results[1].html, "<p>staff</p>");
    }

    #[test]
    fn tag_href_encodes_both_path_segments() {
        let link = TagLink::new("staff", "my art");
        assert_eq!(link.text, "my art");
        assert_eq!(link.href, "https://tumblr.com/blog/view/staff/tagged/my%20art");

        let link = TagLink::new("odd/blog", "a#b");
        assert_eq!(link.text, "a#b");
        assert_eq!(link.href, "https://tumblr.com/blog/view/odd%2Fblog/tagged/a%23b");
    }

    #[test]
    fn empty_results_clear_the_container() {
        let mut page = PageView::new();
        page.render_results(&[item("a", &[]), item("b", &[])]);
        assert_eq!(page.results.len(), 2);
        page.render_results(&[]);
        assert!(page.results.is_empty());
    }

    #[test]
    fn toggle_twice_restores_clipping() {
        let mut page = PageView::new();
        page.render_results(&[item("staff", &[])]);
        let original = page.results[0].body_style();
        assert_eq!(page.toggle_preview(0).unwrap(), Preview::Unclipped);
        assert_eq!(page.results[0].body_style(), None);
        assert_eq!(page.toggle_preview(0).unwrap(), Preview::Clipped);
        assert_eq!(page.results[0].body_style(), original);
    }

    #[test]
    fn toggle_out_of_range_is_an_error() {
        let mut page = PageView::new();
        let err = page.toggle_preview(3).unwrap_err();
        assert!(matches!(err, ClientError::NoSuchResult { index: 3, len: 0 }));
    }

    #[test]
    fn scroll_resets_to_top() {
        let mut page = PageView::new();
        page.scroll_top = 640;
        page.reset_scroll();
        assert_eq!(page.scroll_top, 0);
    }
}
