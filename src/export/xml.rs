use crate::domain::model::{CapturedItem, Company};
use crate::export::value_to_text;
use crate::utils::error::Result;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

type XmlWriter = Writer<Vec<u8>>;

fn new_document() -> Result<XmlWriter> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    Ok(writer)
}

fn open(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    Ok(())
}

fn close(writer: &mut XmlWriter, name: &str) -> Result<()> {
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// `<name>text</name>`, or `<name/>` for empty text.
fn text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }
    open(writer, name)?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    close(writer, name)
}

/// `<field name="key">text</field>` for keys that cannot be tag names.
fn named_field(writer: &mut XmlWriter, key: &str, text: &str) -> Result<()> {
    let start = BytesStart::new("field").with_attributes([("name", key)]);
    if text.is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }
    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    close(writer, "field")
}

/// Unprefixed XML name: a letter or `_`, then letters, digits, `-`, `_` or `.`.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

/// `<companies><company>…<reviews><review>…</review></reviews></company></companies>`
pub fn companies_to_xml(companies: &[Company]) -> Result<Vec<u8>> {
    let mut writer = new_document()?;
    open(&mut writer, "companies")?;

    for company in companies {
        open(&mut writer, "company")?;
        text_element(&mut writer, "company_name", &company.company_name)?;
        text_element(&mut writer, "rating", &company.rating)?;
        text_element(&mut writer, "total_reviews", &company.total_reviews)?;

        open(&mut writer, "reviews")?;
        for review in &company.reviews {
            open(&mut writer, "review")?;
            text_element(&mut writer, "user_name", &review.user_name)?;
            text_element(&mut writer, "date", &review.date)?;
            text_element(&mut writer, "rating", &review.rating.to_string())?;
            text_element(&mut writer, "text", &review.text)?;
            close(&mut writer, "review")?;
        }
        close(&mut writer, "reviews")?;

        close(&mut writer, "company")?;
    }

    close(&mut writer, "companies")?;
    Ok(writer.into_inner())
}

/// Flat `<comments><comment>…</comment></comments>`; each comment carries
/// exactly the keys of its own item, so shapes may differ between comments.
pub fn items_to_xml(items: &[CapturedItem]) -> Result<Vec<u8>> {
    let mut writer = new_document()?;
    open(&mut writer, "comments")?;

    for item in items {
        open(&mut writer, "comment")?;
        for (key, value) in item {
            let text = value_to_text(value);
            if is_xml_name(key) {
                text_element(&mut writer, key, &text)?;
            } else {
                tracing::warn!("Key {:?} is not a valid XML name, writing it as <field>", key);
                named_field(&mut writer, key, &text)?;
            }
        }
        close(&mut writer, "comment")?;
    }

    close(&mut writer, "comments")?;
    Ok(writer.into_inner())
}
