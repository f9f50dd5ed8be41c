//! Inline package fixtures shared by the presentation tests.

use crate::ooxml::opc::MemoryPackage;

pub(crate) const NS: &str = concat!(
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#
);

pub(crate) const SLIDE: &str = "/ppt/slides/slide1.xml";
pub(crate) const LAYOUT: &str = "/ppt/slideLayouts/slideLayout1.xml";
pub(crate) const MASTER: &str = "/ppt/slideMasters/slideMaster1.xml";
pub(crate) const THEME: &str = "/ppt/theme/theme1.xml";

pub(crate) const DEFAULT_CLR_MAP: &str = r#"bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink""#;

/// Route fallback events to the test output.
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/";

/// `p:bg` with a solid `srgbClr`.
pub(crate) fn solid_bg(hex: &str) -> String {
    format!(r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="{hex}"/></a:solidFill><a:effectLst/></p:bgPr></p:bg>"#)
}

/// `p:clrMapOvr` remapping the given slots.
pub(crate) fn clr_map_ovr(attrs: &str) -> String {
    format!(r#"<p:clrMapOvr><a:overrideClrMapping {attrs}/></p:clrMapOvr>"#)
}

/// A placeholder shape with optional list style and paragraphs.
pub(crate) fn placeholder(ph_attrs: &str, lst_style: &str, paragraphs: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="ph"/><p:cNvSpPr/><p:nvPr><p:ph {ph_attrs}/></p:nvPr></p:nvSpPr><p:spPr/><p:txBody><a:bodyPr/><a:lstStyle>{lst_style}</a:lstStyle>{paragraphs}</p:txBody></p:sp>"#
    )
}

pub(crate) fn slide(bg: &str, ovr: &str, shapes: &str) -> String {
    format!(r#"<p:sld {NS}><p:cSld>{bg}<p:spTree>{shapes}</p:spTree></p:cSld>{ovr}</p:sld>"#)
}

pub(crate) fn layout(bg: &str, ovr: &str, shapes: &str) -> String {
    format!(r#"<p:sldLayout {NS}><p:cSld>{bg}<p:spTree>{shapes}</p:spTree></p:cSld>{ovr}</p:sldLayout>"#)
}

pub(crate) fn master(bg: &str, clr_map: &str, shapes: &str, tx_styles: &str) -> String {
    format!(
        r#"<p:sldMaster {NS}><p:cSld>{bg}<p:spTree>{shapes}</p:spTree></p:cSld><p:clrMap {clr_map}/><p:txStyles>{tx_styles}</p:txStyles></p:sldMaster>"#
    )
}

pub(crate) fn theme(bg_fill_styles: &str) -> String {
    format!(
        r#"<a:theme {NS} name="Test">
  <a:themeElements>
    <a:clrScheme name="Test">
      <a:dk1><a:srgbClr val="000000"/></a:dk1>
      <a:lt1><a:srgbClr val="FFFFFF"/></a:lt1>
      <a:dk2><a:srgbClr val="44546A"/></a:dk2>
      <a:lt2><a:srgbClr val="E7E6E6"/></a:lt2>
      <a:accent1><a:srgbClr val="4472C4"/></a:accent1>
      <a:accent2><a:srgbClr val="ED7D31"/></a:accent2>
      <a:accent3><a:srgbClr val="A5A5A5"/></a:accent3>
      <a:accent4><a:srgbClr val="FFC000"/></a:accent4>
      <a:accent5><a:srgbClr val="5B9BD5"/></a:accent5>
      <a:accent6><a:srgbClr val="70AD47"/></a:accent6>
      <a:hlink><a:srgbClr val="0563C1"/></a:hlink>
      <a:folHlink><a:srgbClr val="954F72"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="Test">
      <a:majorFont><a:latin typeface="Calibri Light"/></a:majorFont>
      <a:minorFont><a:latin typeface="Calibri"/></a:minorFont>
    </a:fontScheme>
    <a:fmtScheme name="Test"><a:bgFillStyleLst>{bg_fill_styles}</a:bgFillStyleLst></a:fmtScheme>
  </a:themeElements>
</a:theme>"#
    )
}

/// A `.rels` document; each entry is `(id, type suffix, target)`.
pub(crate) fn rels(entries: &[(&str, &str, &str)]) -> String {
    let mut xml =
        String::from(r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#);
    for (id, suffix, target) in entries {
        xml.push_str(&format!(r#"<Relationship Id="{id}" Type="{REL_BASE}{suffix}" Target="{target}"/>"#));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Parts of a one-slide deck. `None` leaves the part out of the package while
/// keeping the relationship that points at it.
#[derive(Debug, Clone, Default)]
pub(crate) struct Deck {
    pub slide: Option<String>,
    pub layout: Option<String>,
    pub master: Option<String>,
    pub theme: Option<String>,
}

impl Deck {
    /// A deck whose every part is present but empty of styling.
    pub fn plain() -> Self {
        Self {
            slide: Some(slide("", "", "")),
            layout: Some(layout("", "", "")),
            master: Some(master("", DEFAULT_CLR_MAP, "", "")),
            theme: Some(theme("")),
        }
    }

    pub fn package(&self) -> MemoryPackage {
        let mut package = MemoryPackage::new()
            .with_part(
                "ppt/slides/_rels/slide1.xml.rels",
                rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
            )
            .with_part(
                "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
                rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
            )
            .with_part(
                "ppt/slideMasters/_rels/slideMaster1.xml.rels",
                rels(&[
                    ("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml"),
                    ("rId2", "theme", "../theme/theme1.xml"),
                ]),
            );
        for (name, xml) in [
            (SLIDE, &self.slide),
            (LAYOUT, &self.layout),
            (MASTER, &self.master),
            (THEME, &self.theme),
        ] {
            if let Some(xml) = xml {
                package.insert(name, xml.clone());
            }
        }
        package
    }
}
