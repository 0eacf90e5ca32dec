use crate::host::WindowHandle;
use crate::managers::plugin_registry::PluginBackend;
use crate::types::errors::PluginError;

pub const ID: &str = "disable-autoplay";

/// Pauses the first track that starts playing on its own after a page load.
const DISABLE_AUTOPLAY_JS: &str = r#"
(function(){
  if (window.__tunedeckDisableAutoplay) return;
  window.__tunedeckDisableAutoplay = true;
  document.addEventListener('play', function onPlay(e){
    if (e.target && e.target.tagName === 'VIDEO') {
      e.target.pause();
      document.removeEventListener('play', onPlay, true);
    }
  }, true);
})();
"#;

pub struct DisableAutoplayPlugin;

impl PluginBackend for DisableAutoplayPlugin {
    fn attach(&self, window: &WindowHandle) -> Result<(), PluginError> {
        window.inject_script(DISABLE_AUTOPLAY_JS);
        Ok(())
    }
}
