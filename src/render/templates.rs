use chrono::Local;
use maud::{html, Markup, PreEscaped, Render, DOCTYPE};

use crate::domain::{Attachment, Post};
use crate::render::sanitize::Sanitizer;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Document shell around one page of statuses.
pub struct Layout<'a> {
    pub stylesheet: &'a str,
}

impl Layout<'_> {
    pub fn render(&self, content: Markup) -> Markup {
        html! {
            (DOCTYPE)
            html {
                head {
                    meta http-equiv="content-type" content="text/html; charset=utf-8";
                    meta name="referrer" content="no-referrer";
                    link rel="stylesheet" type="text/css" href=(self.stylesheet);
                }
                body {
                    (content)
                }
            }
        }
    }
}

/// One `.status` block. Everything but the body is escaped by maud; the
/// body goes through the sanitizer instead.
pub struct StatusCard<'a> {
    pub post: &'a Post,
    pub sanitizer: &'a Sanitizer,
}

impl Render for StatusCard<'_> {
    fn render(&self) -> Markup {
        let post = self.post;
        let author = &post.author;
        let timestamp = post
            .published_at
            .with_timezone(&Local)
            .format(TIMESTAMP_FORMAT)
            .to_string();

        html! {
            div class="status" {
                div class="date" {
                    a href=(post.url) target="_blank" { (timestamp) }
                }
                div class="avatar" {
                    @if let Some(avatar) = &author.avatar {
                        img src=(avatar);
                    }
                }
                div class="title" {
                    a href=(author.url) target="_blank" { (author.display_name()) }
                }
                div class="user" {
                    a href=(author.url) target="_blank" { (author.url) }
                }
                div class="body" {
                    (PreEscaped(self.sanitizer.clean(&post.body)))
                }
                @for attachment in &post.attachments {
                    (AttachmentBlock(attachment))
                }
            }
        }
    }
}

struct AttachmentBlock<'a>(&'a Attachment);

impl Render for AttachmentBlock<'_> {
    fn render(&self) -> Markup {
        let attachment = self.0;
        html! {
            div class="attachment" {
                @if attachment.is_video() {
                    a href=(attachment.url) { "Video: " (attachment.url) }
                } @else {
                    img src=(attachment.url);
                }
            }
        }
    }
}

/// Footer linking every page by its 1-based number.
pub struct PageIndex {
    pub total_pages: usize,
}

impl Render for PageIndex {
    fn render(&self) -> Markup {
        html! {
            div class="pages" {
                @for number in 1..=self.total_pages {
                    a href=(super::page_filename(number)) class="page" { (number) }
                }
            }
        }
    }
}
