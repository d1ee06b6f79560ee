//! Style blocks injected at startup

pub const LEADERBOARD_STYLE_ID: &str = "skillboard-leaderboard-style";
pub const OVERLAY_STYLE_ID: &str = "skillboard-loader-style";

/// Loading, error and retry states inside the leaderboard
pub const LEADERBOARD_CSS: &str = r#"
.loading {
  text-align: center;
  padding: 60px 20px;
  color: var(--color-text-light);
}

.loading-spinner {
  width: 40px;
  height: 40px;
  border: 4px solid rgba(255, 102, 170, 0.3);
  border-top: 4px solid var(--color-primary);
  border-radius: 50%;
  animation: spin 1s linear infinite;
  margin: 0 auto 20px;
}

@keyframes spin {
  0% { transform: rotate(0deg); }
  100% { transform: rotate(360deg); }
}

.loading-tip, .error-tip {
  font-size: 14px;
  opacity: 0.8;
  margin-top: 10px;
}

.retry-btn {
  background: var(--color-primary);
  color: white;
  border: none;
  padding: 10px 20px;
  border-radius: 6px;
  cursor: pointer;
  font-size: 14px;
  margin: 10px 0;
  transition: background 0.3s ease;
}

.retry-btn:hover {
  background: #e055a3;
}

.error-state {
  color: #ff6b6b;
}

.error-state h3 {
  color: #ff6b6b;
}
"#;

/// Full-page overlay; hidden until it carries the active class
pub const OVERLAY_CSS: &str = r#"
#global-loader {
  position: fixed;
  inset: 0;
  z-index: 9999;
  display: none;
  align-items: center;
  justify-content: center;
  background: rgba(0, 0, 0, 0.6);
}

#global-loader.active {
  display: flex;
}

#global-loader .loading {
  text-align: center;
  color: white;
}

#global-loader .loading-spinner {
  width: 40px;
  height: 40px;
  border: 4px solid rgba(255, 102, 170, 0.3);
  border-top: 4px solid var(--color-primary, #ff66aa);
  border-radius: 50%;
  animation: loader-spin 1s linear infinite;
  margin: 0 auto 20px;
}

@keyframes loader-spin {
  0% { transform: rotate(0deg); }
  100% { transform: rotate(360deg); }
}

#global-loader .loading-text {
  font-size: 18px;
  margin: 0;
}

#global-loader .loading-tip {
  font-size: 14px;
  opacity: 0.8;
  margin-top: 10px;
}
"#;
