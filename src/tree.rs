/// A markup element: tag, attributes in insertion order, optional text and
/// child elements in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }
}

/// Root element plus its records. Tag names are not validated here; the
/// serializer rejects names that are not legal markup.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    pub fn new_root(tag: impl Into<String>) -> Self {
        Self {
            root: Element::new(tag),
        }
    }

    /// Attach a record element carrying `id="<index>"` and return it for
    /// field insertion.
    pub fn append_record(&mut self, tag: &str, index: usize) -> &mut Element {
        self.root
            .children
            .push(Element::new(tag).with_attribute("id", index.to_string()));
        let last = self.root.children.len() - 1;
        &mut self.root.children[last]
    }

    pub fn records(&self) -> &[Element] {
        &self.root.children
    }
}

pub fn append_field(record: &mut Element, name: &str, text: impl Into<String>) {
    record.children.push(Element::new(name).with_text(text));
}
