//! Integration tests for PDF input: documents are built in memory with lopdf.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use pdfmd::{
    convert_bytes, convert_file, ConvertOptions, Error, PageSelection, PageSource, PdfSource,
};

/// One text run: font resource, size, position, text.
type Run = (&'static str, i64, i64, i64, &'static str);

fn text_page(runs: &[Run]) -> Vec<Operation> {
    let mut ops = Vec::new();
    for &(font, size, x, y, text) in runs {
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        ops.push(Operation::new("Td", vec![x.into(), y.into()]));
        ops.push(Operation::new("Tj", vec![Object::string_literal(text)]));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

/// Build a PDF whose pages carry the given content operations.
fn build_pdf(pages: Vec<Vec<Operation>>) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            "F1" => regular_id,
            "F2" => bold_id,
        },
    });

    let kids: Vec<ObjectId> = pages
        .into_iter()
        .map(|operations| {
            let content = Content { operations };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            })
        })
        .collect();

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids.into_iter().map(Object::from).collect::<Vec<_>>(),
            "Count" => count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

fn report_pdf() -> Vec<u8> {
    build_pdf(vec![
        text_page(&[
            ("F1", 24, 72, 740, "Annual Report"),
            ("F1", 10, 72, 700, "Revenue grew this year."),
            ("F1", 10, 72, 686, "Costs were flat."),
        ]),
        vec![],
        text_page(&[
            ("F1", 10, 72, 700, "- first item"),
            ("F1", 10, 72, 686, "- second item"),
        ]),
    ])
}

#[test]
fn test_pdf_source_page_count_and_fragments() {
    let source = PdfSource::from_bytes(&report_pdf()).unwrap();
    assert_eq!(source.page_count(), 3);
    assert_eq!(source.version(), "1.5");
    assert!(!source.is_encrypted());

    let fragments = source.page_fragments(1).unwrap();
    assert_eq!(fragments.len(), 3);
    assert_eq!(fragments[0].text(), Some("Annual Report"));
    assert_eq!(fragments[0].font_name(), "Helvetica");

    let g = fragments[0].geometry().unwrap();
    assert_eq!(g.font_size, 24.0);
    assert_eq!((g.x, g.y), (72.0, 740.0));

    assert!(source.page_fragments(2).unwrap().is_empty());
    assert!(matches!(
        source.page_fragments(4),
        Err(Error::PageOutOfRange(4, 3))
    ));
}

#[test]
fn test_convert_bytes_end_to_end() {
    let result = convert_bytes(&report_pdf(), &ConvertOptions::default()).unwrap();

    assert_eq!(result.page_count, 3);
    assert_eq!(result.pages.len(), 3);
    assert!(result.pages[1].is_empty());
    assert_eq!(
        result.markdown,
        "# Annual Report\n\nRevenue grew this year. Costs were flat.\n\n---\n\n- first item\n- second item"
    );
    assert_eq!(result.markdown.matches("\n\n---\n\n").count(), 1);
}

#[test]
fn test_convert_file_with_page_selection() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), report_pdf()).unwrap();

    let options = ConvertOptions::new().with_pages(PageSelection::Pages(vec![3, 7]));
    let result = convert_file(file.path(), &options).unwrap();

    assert_eq!(result.pages.len(), 1);
    assert_eq!(result.pages[0].number, 3);
    assert_eq!(result.markdown, "- first item\n- second item");
}

#[test]
fn test_bold_base_font_and_tj_spacing() {
    let operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F2".into(), 12.into()]),
        Operation::new("Td", vec![72.into(), 700.into()]),
        Operation::new(
            "TJ",
            vec![Object::Array(vec![
                Object::string_literal("Key"),
                Object::Integer(-300),
                Object::string_literal("Findings"),
            ])],
        ),
        Operation::new("ET", vec![]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![72.into(), 680.into()]),
        Operation::new("Tj", vec![Object::string_literal("Plain body text")]),
        Operation::new("ET", vec![]),
    ];
    let pdf = build_pdf(vec![operations]);

    let source = PdfSource::from_bytes(&pdf).unwrap();
    let fragments = source.page_fragments(1).unwrap();
    assert_eq!(fragments[0].text(), Some("Key Findings"));
    assert_eq!(fragments[0].font_name(), "Helvetica-Bold");

    // Bold at the page's average size counts as a title.
    let result = convert_bytes(&pdf, &ConvertOptions::default()).unwrap();
    assert_eq!(result.markdown, "#### Key Findings\n\nPlain body text");
}

#[test]
fn test_text_matrix_and_next_line_operators() {
    let operations = vec![
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("TL", vec![14.into()]),
        Operation::new(
            "Tm",
            vec![
                1.into(),
                0.into(),
                0.into(),
                1.into(),
                72.into(),
                700.into(),
            ],
        ),
        Operation::new("Tj", vec![Object::string_literal("first line")]),
        Operation::new("'", vec![Object::string_literal("second line")]),
        Operation::new("T*", vec![]),
        Operation::new("Tj", vec![Object::string_literal("third line")]),
        Operation::new("ET", vec![]),
    ];
    let source = PdfSource::from_bytes(&build_pdf(vec![operations])).unwrap();
    let ys: Vec<f32> = source
        .page_fragments(1)
        .unwrap()
        .iter()
        .map(|f| f.geometry().unwrap().y)
        .collect();
    assert_eq!(ys, vec![700.0, 686.0, 672.0]);
}

#[test]
fn test_leading_set_before_text_object_is_kept() {
    let operations = vec![
        Operation::new("TL", vec![30.into()]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 10.into()]),
        Operation::new("Td", vec![72.into(), 700.into()]),
        Operation::new("Tj", vec![Object::string_literal("a")]),
        Operation::new("T*", vec![]),
        Operation::new("Tj", vec![Object::string_literal("b")]),
        Operation::new("ET", vec![]),
    ];
    let source = PdfSource::from_bytes(&build_pdf(vec![operations])).unwrap();
    let ys: Vec<f32> = source
        .page_fragments(1)
        .unwrap()
        .iter()
        .map(|f| f.geometry().unwrap().y)
        .collect();
    assert_eq!(ys, vec![700.0, 670.0]);
}

#[test]
fn test_scaled_ctm_applies_to_fragments() {
    let operations = vec![
        Operation::new("q", vec![]),
        Operation::new(
            "cm",
            vec![
                Object::Real(0.5),
                0.into(),
                0.into(),
                Object::Real(0.5),
                0.into(),
                0.into(),
            ],
        ),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 24.into()]),
        Operation::new("Td", vec![144.into(), 1400.into()]),
        Operation::new("Tj", vec![Object::string_literal("body text")]),
        Operation::new("ET", vec![]),
        Operation::new("Q", vec![]),
        Operation::new("BT", vec![]),
        Operation::new("Tf", vec!["F1".into(), 12.into()]),
        Operation::new("Td", vec![72.into(), 600.into()]),
        Operation::new("Tj", vec![Object::string_literal("after restore")]),
        Operation::new("ET", vec![]),
    ];
    let pdf = build_pdf(vec![operations]);

    let source = PdfSource::from_bytes(&pdf).unwrap();
    let geometry: Vec<_> = source
        .page_fragments(1)
        .unwrap()
        .iter()
        .map(|f| f.geometry().unwrap())
        .collect();
    assert_eq!(geometry[0].font_size, 12.0);
    assert_eq!((geometry[0].x, geometry[0].y), (72.0, 700.0));
    assert_eq!(geometry[1].font_size, 12.0);
    assert_eq!((geometry[1].x, geometry[1].y), (72.0, 600.0));

    let result = convert_bytes(&pdf, &ConvertOptions::default()).unwrap();
    assert_eq!(result.markdown, "body text after restore");
}

#[test]
fn test_corrupt_pdf_is_pdf_parse_error() {
    let mut pdf = report_pdf();
    pdf.truncate(pdf.len() / 3);

    let err = convert_bytes(&pdf, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, Error::PdfParse { .. }));
}
