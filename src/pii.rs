use scraper::{ElementRef, Html};

use crate::client::ClientError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPii {
    pub email: String,
    pub name: String,
    pub ip: String,
}

/// Where a field lives in the `/admin/all-pii` fragment: the top-level node
/// at `node`, then its element child at `child`.
#[derive(Debug, Clone, Copy)]
struct FieldLocator {
    field: &'static str,
    node: usize,
    child: usize,
}

const EMAIL: FieldLocator = FieldLocator {
    field: "email",
    node: 1,
    child: 1,
};
const NAME: FieldLocator = FieldLocator {
    field: "name",
    node: 1,
    child: 3,
};
const IP: FieldLocator = FieldLocator {
    field: "ip",
    node: 3,
    child: 1,
};

/// Extracts email, name and ip from the admin PII response.
///
/// Text before the first tag and after the last tag is ignored; every node in
/// between (text, comment or element) counts towards the top-level position.
pub fn parse_pii_fragment(body: &str) -> Result<UserPii, ClientError> {
    let trimmed = match (body.find('<'), body.rfind('>')) {
        (Some(start), Some(end)) if start < end => &body[start..=end],
        _ => return Err(ClientError::UnexpectedShape { field: EMAIL.field }),
    };
    let fragment = Html::parse_fragment(trimmed);
    let top_level: Vec<_> = fragment.root_element().children().collect();

    let locate = |locator: FieldLocator| -> Result<String, ClientError> {
        let shape_error = || ClientError::UnexpectedShape {
            field: locator.field,
        };
        let block = top_level
            .get(locator.node)
            .copied()
            .and_then(ElementRef::wrap)
            .ok_or_else(shape_error)?;
        let element = block
            .children()
            .filter_map(ElementRef::wrap)
            .nth(locator.child)
            .ok_or_else(shape_error)?;
        Ok(element.text().collect::<String>().trim().to_string())
    };

    Ok(UserPii {
        email: locate(EMAIL)?,
        name: locate(NAME)?,
        ip: locate(IP)?,
    })
}
