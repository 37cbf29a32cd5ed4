//! In-memory AcroForm document used by the unit tests

use lopdf::{Dictionary, Document, Object};

fn name(s: &str) -> Object {
    Object::Name(s.as_bytes().to_vec())
}

fn string(s: &str) -> Object {
    Object::String(s.as_bytes().to_vec(), lopdf::StringFormat::Literal)
}

fn rect(x1: i64, y1: i64, x2: i64, y2: i64) -> Object {
    Object::Array(vec![
        Object::Integer(x1),
        Object::Integer(y1),
        Object::Integer(x2),
        Object::Integer(y2),
    ])
}

fn appearance(on_state: &str) -> Object {
    let mut normal = Dictionary::new();
    normal.set(on_state, Object::Null);
    normal.set("Off", Object::Null);
    let mut ap = Dictionary::new();
    ap.set("N", Object::Dictionary(normal));
    Object::Dictionary(ap)
}

/// Two US Letter pages with a text field, a checkbox, a dropdown, a
/// two-page radio group, and a hierarchical `address.city` text field
pub(crate) fn form_test_pdf() -> Document {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    // Text field, widget and field in one dictionary
    let mut name_field = Dictionary::new();
    name_field.set("Type", name("Annot"));
    name_field.set("Subtype", name("Widget"));
    name_field.set("T", string("name"));
    name_field.set("FT", name("Tx"));
    name_field.set("Ff", Object::Integer(1 << 1)); // required
    name_field.set("MaxLen", Object::Integer(40));
    name_field.set("Rect", rect(100, 600, 300, 620));
    let name_id = doc.add_object(Object::Dictionary(name_field));

    let mut agree = Dictionary::new();
    agree.set("Type", name("Annot"));
    agree.set("Subtype", name("Widget"));
    agree.set("T", string("agree"));
    agree.set("FT", name("Btn"));
    agree.set("V", name("Off"));
    agree.set("Rect", rect(100, 560, 120, 580));
    agree.set("AP", appearance("Yes"));
    let agree_id = doc.add_object(Object::Dictionary(agree));

    let mut state = Dictionary::new();
    state.set("Type", name("Annot"));
    state.set("Subtype", name("Widget"));
    state.set("T", string("state"));
    state.set("FT", name("Ch"));
    state.set("Ff", Object::Integer(1 << 17)); // combo
    state.set("Opt", Object::Array(vec![string("FL"), string("CA")]));
    state.set("V", string("FL"));
    state.set("Rect", rect(100, 520, 250, 540));
    let state_id = doc.add_object(Object::Dictionary(state));

    // Radio group with one widget per page
    let radio_id = doc.new_object_id();
    let mut red = Dictionary::new();
    red.set("Type", name("Annot"));
    red.set("Subtype", name("Widget"));
    red.set("Parent", Object::Reference(radio_id));
    red.set("Rect", rect(100, 500, 120, 520));
    red.set("AP", appearance("Red"));
    let red_id = doc.add_object(Object::Dictionary(red));

    let mut blue = Dictionary::new();
    blue.set("Type", name("Annot"));
    blue.set("Subtype", name("Widget"));
    blue.set("Parent", Object::Reference(radio_id));
    blue.set("Rect", rect(100, 480, 120, 500));
    blue.set("AP", appearance("Blue"));
    let blue_id = doc.add_object(Object::Dictionary(blue));

    let mut radio = Dictionary::new();
    radio.set("T", string("color"));
    radio.set("FT", name("Btn"));
    radio.set("Ff", Object::Integer(1 << 15)); // radio
    radio.set("V", name("Red"));
    radio.set(
        "Kids",
        Object::Array(vec![Object::Reference(red_id), Object::Reference(blue_id)]),
    );
    doc.objects.insert(radio_id, Object::Dictionary(radio));

    // Non-terminal "address" parent with a "city" child field
    let mut city = Dictionary::new();
    city.set("Type", name("Annot"));
    city.set("Subtype", name("Widget"));
    city.set("T", string("city"));
    city.set("FT", name("Tx"));
    city.set("Rect", rect(100, 440, 300, 460));
    let city_id = doc.add_object(Object::Dictionary(city));

    let mut address = Dictionary::new();
    address.set("T", string("address"));
    address.set("Kids", Object::Array(vec![Object::Reference(city_id)]));
    let address_id = doc.add_object(Object::Dictionary(address));

    let mut page1 = Dictionary::new();
    page1.set("Type", name("Page"));
    page1.set("Parent", Object::Reference(pages_id));
    page1.set("MediaBox", rect(0, 0, 612, 792));
    page1.set(
        "Annots",
        Object::Array(vec![
            Object::Reference(name_id),
            Object::Reference(agree_id),
            Object::Reference(red_id),
        ]),
    );
    let page1_id = doc.add_object(Object::Dictionary(page1));

    let mut page2 = Dictionary::new();
    page2.set("Type", name("Page"));
    page2.set("Parent", Object::Reference(pages_id));
    page2.set("MediaBox", rect(0, 0, 612, 792));
    page2.set(
        "Annots",
        Object::Array(vec![
            Object::Reference(state_id),
            Object::Reference(blue_id),
            Object::Reference(city_id),
        ]),
    );
    let page2_id = doc.add_object(Object::Dictionary(page2));

    let mut pages = Dictionary::new();
    pages.set("Type", name("Pages"));
    pages.set(
        "Kids",
        Object::Array(vec![
            Object::Reference(page1_id),
            Object::Reference(page2_id),
        ]),
    );
    pages.set("Count", Object::Integer(2));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut acroform = Dictionary::new();
    acroform.set(
        "Fields",
        Object::Array(vec![
            Object::Reference(name_id),
            Object::Reference(agree_id),
            Object::Reference(state_id),
            Object::Reference(radio_id),
            Object::Reference(address_id),
        ]),
    );
    let acroform_id = doc.add_object(Object::Dictionary(acroform));

    let mut catalog = Dictionary::new();
    catalog.set("Type", name("Catalog"));
    catalog.set("Pages", Object::Reference(pages_id));
    catalog.set("AcroForm", Object::Reference(acroform_id));
    let catalog_id = doc.add_object(Object::Dictionary(catalog));

    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}
