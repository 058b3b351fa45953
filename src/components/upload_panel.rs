//! Upload Panel Component
//!
//! Photo picker plus the live upload queue. Entries are compressed and
//! uploaded one at a time; failed ones can be retried.

use leptos::prelude::*;
use leptos::task::spawn_local;
use wasm_bindgen::JsCast;

use declutter_core::upload::{UploadId, UploadStatus};

use crate::commands;
use crate::context::use_app;

/// What a queue row shows; cheap to clone unlike the file bytes
#[derive(Clone, PartialEq)]
struct QueueRow {
    id: UploadId,
    name: String,
    status: UploadStatus,
    error: Option<String>,
}

fn status_class(status: UploadStatus) -> &'static str {
    match status {
        UploadStatus::Pending => "upload-row pending",
        UploadStatus::Compressing | UploadStatus::Uploading => "upload-row active",
        UploadStatus::Success => "upload-row success",
        UploadStatus::Failed => "upload-row failed",
    }
}

#[component]
pub fn UploadPanel() -> impl IntoView {
    let ctx = use_app();

    let rows = move || {
        ctx.queue.with(|q| {
            q.items()
                .iter()
                .map(|item| QueueRow {
                    id: item.id,
                    name: item.file.display_name(),
                    status: item.status,
                    error: item.error.clone(),
                })
                .collect::<Vec<_>>()
        })
    };
    let has_failed = move || ctx.queue.with(|q| q.has_failed());
    let has_completed = move || ctx.queue.with(|q| q.count(UploadStatus::Success) > 0);
    let is_empty = move || ctx.queue.with(|q| q.is_empty());

    let on_files = move |ev: web_sys::Event| {
        let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
            return;
        };
        let Some(list) = input.files() else {
            return;
        };
        spawn_local(async move {
            let mut files = Vec::new();
            for result in commands::read_file_list(&list).await {
                match result {
                    Ok(file) => files.push(file),
                    Err(err) => {
                        tracing::warn!(error = %err, "could not read picked file");
                        ctx.toast_error(format!("Could not read file: {}", err));
                    }
                }
            }
            // Allow picking the same files again
            input.set_value("");
            tracing::info!(count = files.len(), "photos queued");
            ctx.enqueue_uploads(files);
        });
    };

    view! {
        <section class="upload-panel">
            <label class="upload-btn">
                "📷 Add photos"
                <input type="file" accept="image/*" multiple hidden on:change=on_files />
            </label>

            <Show when=move || !is_empty()>
                <ul class="upload-queue">
                    <For
                        each=rows
                        key=|row| (row.id, row.status, row.error.clone())
                        children=move |row| {
                            view! {
                                <li class=status_class(row.status)>
                                    <span class="upload-name">{row.name}</span>
                                    <span class="upload-status">{row.status.label()}</span>
                                    {row.error.map(|e| view! { <span class="upload-error">{e}</span> })}
                                </li>
                            }
                        }
                    />
                </ul>
                <div class="upload-actions">
                    <Show when=has_failed>
                        <button on:click=move |_| ctx.retry_failed_uploads()>"Retry failed"</button>
                    </Show>
                    <Show when=has_completed>
                        <button on:click=move |_| ctx.queue.update(|q| q.clear_completed())>"Clear done"</button>
                    </Show>
                    <button
                        disabled=move || ctx.processing.get()
                        on:click=move |_| ctx.queue.update(|q| q.clear_queue())
                    >
                        "Clear all"
                    </button>
                </div>
            </Show>
        </section>
    }
}
