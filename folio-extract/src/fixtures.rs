//! Markup builders shaped like the profile "experience" list, plus
//! in-memory images for the logo fetches.

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

#[derive(Default)]
pub struct EntryHtml<'a> {
    pub logo: Option<&'a str>,
    pub title: Option<&'a str>,
    pub company: Option<&'a str>,
    pub details: &'a [&'a str],
    pub sub_components: &'a [&'a str],
    pub without_container: bool,
}

fn hidden(text: &str) -> String {
    format!(
        r#"<span aria-hidden="true"><!---->{text}<!----></span><span class="visually-hidden"><!---->{text}<!----></span>"#
    )
}

impl EntryHtml<'_> {
    pub fn render(&self) -> String {
        let logo = self
            .logo
            .map(|src| {
                format!(
                    r#"<a class="optional-action-target-wrapper"><div class="ivm-image-view-model"><img width="48" src="{src}" class="ivm-view-attr__img--centered EntityPhoto-square-3 evi-image" alt=""></div></a>"#
                )
            })
            .unwrap_or_default();
        let title = self
            .title
            .map(|t| {
                format!(
                    r#"<div class="display-flex align-items-center mr1 hoverable-link-text t-bold">{}</div>"#,
                    hidden(t)
                )
            })
            .unwrap_or_default();
        let company = self
            .company
            .map(|c| format!(r#"<span class="t-14 t-normal">{}</span>"#, hidden(c)))
            .unwrap_or_default();
        let details: String = self
            .details
            .iter()
            .map(|d| format!(r#"<span class="t-14 t-normal t-black--light">{}</span>"#, hidden(d)))
            .collect();
        let subs: String = self
            .sub_components
            .iter()
            .map(|s| format!(r#"<li><div class="display-flex">{}</div></li>"#, hidden(s)))
            .collect();
        let container_class = if self.without_container {
            "display-flex flex-column"
        } else {
            "display-flex flex-column align-self-center flex-grow-1"
        };

        format!(
            r#"<li class="pvs-list__paged-list-item artdeco-list__item pvs-list__item--line-separated">
  <div class="pvs-entity--padded">
    <div>{logo}</div>
    <div class="{container_class}">
      <div class="display-flex flex-row justify-space-between">
        <div class="display-flex flex-column full-width">{title}{company}{details}</div>
      </div>
      <div class="pvs-entity__sub-components"><ul>{subs}</ul></div>
    </div>
  </div>
</li>"#
        )
    }
}

/// Semi-transparent solid PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba([200, 40, 40, 120]),
    ));
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}

pub fn document(entries: &[EntryHtml<'_>]) -> String {
    let items: String = entries.iter().map(EntryHtml::render).collect();
    format!(
        r#"<section class="artdeco-card pb3"><div class="pvs-list__container"><ul class="pvs-list">{items}</ul></div></section>"#
    )
}
