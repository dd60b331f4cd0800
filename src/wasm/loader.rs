//! Background loading of the overlay frame sequence.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo::timers::future::TimeoutFuture;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{HtmlImageElement, WebGl2RenderingContext as GL, WebGlTexture};

use super::compositor;
use crate::config::{FrameSource, RetryPolicy};
use crate::error::RevealError;
use crate::frames::FrameSequence;

pub type Frames = Rc<RefCell<FrameSequence<WebGlTexture>>>;

/// Fire-and-forget: fills `frames` slot by slot until done, failed, or
/// `alive` is cleared.
pub fn spawn(
    gl: GL,
    source: FrameSource,
    retry: RetryPolicy,
    frames: Frames,
    alive: Rc<Cell<bool>>,
) {
    spawn_local(async move {
        match load_all(&gl, &source, retry, &frames, &alive).await {
            Ok(true) => log::info!("loaded {} overlay frames", source.count),
            Ok(false) => log::debug!("overlay loading cancelled"),
            Err((index, err)) => {
                log::error!("{err}; overlay stays on the base video");
                frames.borrow_mut().fail(index);
            }
        }
    });
}

async fn load_all(
    gl: &GL,
    source: &FrameSource,
    retry: RetryPolicy,
    frames: &Frames,
    alive: &Cell<bool>,
) -> Result<bool, (usize, RevealError)> {
    for index in 0..source.count {
        let url = source.url(index);
        let Some(image) = load_with_retry(index, &url, retry, alive)
            .await
            .map_err(|e| (index, e))?
        else {
            return Ok(false);
        };
        if !alive.get() {
            return Ok(false);
        }
        let texture = compositor::create_texture(gl).map_err(|e| (index, e))?;
        if let Err(err) = compositor::upload_image(gl, &texture, &image) {
            gl.delete_texture(Some(&texture));
            return Err((index, err));
        }
        // A drained sequence refuses new slots; the texture is ours to free.
        if let Err(texture) = frames.borrow_mut().push(texture) {
            gl.delete_texture(Some(&texture));
            return Ok(false);
        }
    }
    Ok(true)
}

/// `Ok(None)` means loading was cancelled while waiting.
async fn load_with_retry(
    index: usize,
    url: &str,
    retry: RetryPolicy,
    alive: &Cell<bool>,
) -> Result<Option<HtmlImageElement>, RevealError> {
    let mut attempt = 1;
    loop {
        if let Some(delay) = retry.delay_before(attempt) {
            TimeoutFuture::new(delay).await;
        }
        if !alive.get() {
            return Ok(None);
        }
        match load_image(url).await {
            Ok(image) => return Ok(Some(image)),
            Err(err) if attempt < retry.attempts => {
                log::warn!("frame {index} ({url}) attempt {attempt} failed: {err}");
                attempt += 1;
            }
            Err(err) => {
                return Err(RevealError::FrameLoad {
                    index,
                    url: url.to_string(),
                    reason: err.to_string(),
                })
            }
        }
    }
}

async fn load_image(url: &str) -> Result<HtmlImageElement, RevealError> {
    let image = HtmlImageElement::new()?;
    image.set_cross_origin(Some("anonymous"));
    image.set_src(url);
    JsFuture::from(image.decode()).await?;
    Ok(image)
}
