use std::collections::HashMap;

use crate::dom::{Dom, NodeId};
use crate::Result;

const ERROR_STYLES_ID: &str = "page-interactions-error-styles";

const ERROR_STYLES: &str = "
    .form-group input.error,
    .form-group textarea.error {
        border-color: #ff4757 !important;
        box-shadow: 0 0 0 3px rgba(255, 71, 87, 0.1) !important;
    }

    .error-message {
        color: #ff4757;
        font-size: 0.8rem;
        margin-top: 0.5rem;
        display: flex;
        align-items: center;
        gap: 0.25rem;
    }

    .error-message::before {
        content: '\u{26a0}\u{fe0f}';
        font-size: 0.7rem;
    }
";

/// Appends the field error stylesheet to `head`, once.
pub(crate) fn inject_error_styles(dom: &mut Dom) -> Result<Option<NodeId>> {
    if let Some(existing) = dom.by_id(ERROR_STYLES_ID) {
        return Ok(Some(existing));
    }
    let Some(head) = dom.query_selector("head")? else {
        tracing::warn!("no head element; error styles not injected");
        return Ok(None);
    };
    let attrs = HashMap::from([("id".to_string(), ERROR_STYLES_ID.to_string())]);
    let style = dom.create_element(head, "style".into(), attrs);
    dom.set_text_content(style, ERROR_STYLES)?;
    Ok(Some(style))
}
