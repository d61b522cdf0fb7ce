use dk_core::KitResult;
use dk_css::CssRule;
use dk_css::parse_stylesheet;
use dk_dom::Document;
use dk_dom::Element;

/// Append-only stylesheet backed by one `<style>` element.
///
/// Rules are never replaced or removed; a restyled component gets a later
/// rule that wins by source order.
#[derive(Debug)]
pub struct StyleSheetSink {
    element: Element,
    text: String,
    rule_count: usize,
}

impl StyleSheetSink {
    pub fn new(document: &Document) -> Self {
        let element = document.create_element("style");
        element.set_attribute("data-domkit", "scoped");
        Self {
            element,
            text: String::new(),
            rule_count: 0,
        }
    }

    /// Appends `{selector} {\n{body}\n}\n` to the buffer. The `<style>`
    /// element sees it on the next [`StyleSheetSink::flush`].
    pub fn append_rule(&mut self, selector: &str, body: &str) {
        self.text.push_str(selector);
        self.text.push_str(" {\n");
        self.text.push_str(body);
        self.text.push_str("\n}\n");
        self.rule_count = self.rule_count.saturating_add(1);
    }

    /// Copies the buffer into the `<style>` element.
    pub(crate) fn flush(&self) {
        if self.element.text_content().as_deref().unwrap_or_default() != self.text {
            self.element.set_text_content(self.text.as_str());
        }
    }

    /// Attaches the `<style>` element under `head` unless it already has a
    /// parent. Returns true if this call attached it.
    pub(crate) fn mount_into(&self, head: &Element) -> KitResult<bool> {
        if self.element.parent().is_some() {
            return Ok(false);
        }
        head.append_child(&self.element)?;
        Ok(true)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    /// Reads the accumulated text back into rule blocks.
    pub fn rules(&self) -> Vec<CssRule> {
        parse_stylesheet(&self.text)
    }

    pub fn element(&self) -> &Element {
        &self.element
    }

    pub fn is_mounted(&self) -> bool {
        self.element.is_connected()
    }
}
