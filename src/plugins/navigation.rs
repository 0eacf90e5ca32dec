use crate::host::WindowHandle;
use crate::managers::plugin_registry::PluginBackend;
use crate::types::errors::PluginError;

pub const ID: &str = "navigation";

/// Adds back/forward controls next to the hosted app's logo.
const NAVIGATION_JS: &str = r#"
(function(){
  if (window.__tunedeckNavigation) return;
  window.__tunedeckNavigation = true;
  function mount(){
    var bar = document.querySelector('ytmusic-nav-bar .left-content');
    if (!bar) { setTimeout(mount, 500); return; }
    var wrap = document.createElement('div');
    wrap.className = 'tunedeck-navigation';
    [['←', function(){ history.back(); }], ['→', function(){ history.forward(); }]].forEach(function(b){
      var btn = document.createElement('button');
      btn.textContent = b[0];
      btn.addEventListener('click', b[1]);
      wrap.appendChild(btn);
    });
    bar.prepend(wrap);
  }
  if (document.readyState === 'loading') document.addEventListener('DOMContentLoaded', mount); else mount();
})();
"#;

pub struct NavigationPlugin;

impl PluginBackend for NavigationPlugin {
    fn attach(&self, window: &WindowHandle) -> Result<(), PluginError> {
        window.inject_script(NAVIGATION_JS);
        Ok(())
    }
}
