// Tunedeck native host
// Hosts the lifecycle core in a `tao` event loop with a `wry` webview.

pub mod webview_app;
