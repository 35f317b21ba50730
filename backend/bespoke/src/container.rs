use bespoke_core::{DeckError, Element, Result};

/// Where a deck's container comes from: a selector resolved against the
/// registry's document, or an element handle.
#[derive(Debug, Clone, PartialEq)]
pub enum Container {
    Selector(String),
    Element(Element),
}

impl Container {
    pub fn resolve(&self, document: Option<&Element>) -> Result<Element> {
        match self {
            Self::Element(el) => Ok(el.clone()),
            Self::Selector(selector) => {
                let root = document.ok_or_else(|| DeckError::NoDocument(selector.clone()))?;
                root.locate(selector)
                    .ok_or_else(|| DeckError::ContainerNotFound(selector.clone()))
            }
        }
    }
}

impl From<&str> for Container {
    fn from(selector: &str) -> Self {
        Self::Selector(selector.to_string())
    }
}

impl From<String> for Container {
    fn from(selector: String) -> Self {
        Self::Selector(selector)
    }
}

impl From<Element> for Container {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<&Element> for Container {
    fn from(el: &Element) -> Self {
        Self::Element(el.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_selectors_against_the_document() {
        let body = Element::new("body");
        let article = Element::with_id("article", "talk");
        body.append_child(article.clone());

        assert_eq!(Container::from("article").resolve(Some(&body)).unwrap(), article);
        assert_eq!(Container::from("#talk").resolve(Some(&body)).unwrap(), article);
        assert_eq!(Container::from("body").resolve(Some(&body)).unwrap(), body);
        assert!(matches!(
            Container::from("aside").resolve(Some(&body)),
            Err(DeckError::ContainerNotFound(s)) if s == "aside"
        ));
        assert!(matches!(
            Container::from("article").resolve(None),
            Err(DeckError::NoDocument(_))
        ));
    }

    #[test]
    fn elements_need_no_document() {
        let article = Element::new("article");
        assert_eq!(Container::from(&article).resolve(None).unwrap(), article);
    }
}
