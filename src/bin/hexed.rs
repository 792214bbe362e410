use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    terminal::{
        BeginSynchronizedUpdate, EndSynchronizedUpdate, EnterAlternateScreen,
        LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use tracing_appender::non_blocking::WorkerGuard;
use tracing::Subscriber;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::SubscriberInitExt;

use hexed::Editor;
use hexed::app::input::InputMode;
use hexed::app::viewport::Geometry;
use hexed::app::{InputEvent, KeyMod};
use hexed::buffer::FileStorage;
use hexed::config::Config;
use hexed::ui::{self, ScreenLayout};

/// ロード失敗時の終了コード
const EXIT_LOAD_FAILURE: i32 = 2;

/// ログファイル名
const LOG_FILE: &str = "hexed.log";

/// Terminal hex editor with vi-style navigation
#[derive(Parser, Debug)]
#[command(name = "hexed")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File to open
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Config file (default: ./hexed.toml when present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Bytes per display group
    #[arg(short, long)]
    group_size: Option<usize>,

    /// Upper bound on bytes per row
    #[arg(short, long)]
    bytes_per_row: Option<usize>,

    /// Directory for hexed.log (logging is off without one)
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    /// Ignore mouse input
    #[arg(long)]
    no_mouse: bool,
}

impl Args {
    /// コマンドライン指定で設定を上書き
    fn apply(&self, config: &mut Config) {
        if let Some(group_size) = self.group_size {
            config.group_size = group_size.max(1);
        }
        if let Some(bytes_per_row) = self.bytes_per_row {
            config.bytes_per_row = Some(bytes_per_row);
        }
        if let Some(dir) = &self.log_dir {
            config.log_dir = Some(dir.clone());
        }
        if self.no_mouse {
            config.mouse = false;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    args.apply(&mut config);

    let guard = match &config.log_dir {
        Some(dir) => init_logging(dir)?,
        None => None,
    };

    let code = session(&args, &config)?;

    // process::exit はデストラクタを呼ばないので、先にログを書き出す
    drop(guard);
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// ファイルを開いて編集を行い、終了コードを返す
fn session(args: &Args, config: &Config) -> Result<i32> {
    // 端末を初期化する前に読み込む（失敗時は終了コード2）
    let editor = match Editor::open(
        &args.file,
        Box::new(FileStorage),
        Geometry::default(),
        config.escape_timeout(),
    ) {
        Ok(editor) => editor,
        Err(e) => {
            tracing::error!(path = %args.file.display(), error = %e, "load failed");
            eprintln!("Error: {}: {}", args.file.display(), e);
            return Ok(EXIT_LOAD_FAILURE);
        }
    };

    // ターミナルの初期化
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    if config.mouse {
        execute!(stdout, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // アプリケーションの実行
    let result = run_app(&mut terminal, editor, config);

    // ターミナルの後処理
    disable_raw_mode()?;
    if config.mouse {
        execute!(terminal.backend_mut(), DisableMouseCapture)?;
    }
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    match result {
        Ok(()) => Ok(0),
        Err(e) => {
            tracing::error!(error = %e, "fatal");
            eprintln!("Error: {}", e);
            Ok(1)
        }
    }
}

/// ログ出力を設定（ログファイルは端末とは別）
fn init_logging(dir: &Path) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_env("HEXED_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let (subscriber, guard) = file_subscriber(dir, filter)?;
    match subscriber.try_init() {
        Ok(()) => Ok(Some(guard)),
        Err(_) => Ok(None),
    }
}

/// `dir/hexed.log` に書き出す subscriber を作る
///
/// 書き込みは別スレッドで行われ、guard を drop したときに残りが書き出される。
fn file_subscriber(
    dir: &Path,
    filter: EnvFilter,
) -> Result<(impl Subscriber + Send + Sync + 'static, WorkerGuard)> {
    fs::create_dir_all(dir)?;
    let file_appender = tracing_appender::rolling::never(dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .finish();
    Ok((subscriber, guard))
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut editor: Editor,
    config: &Config,
) -> Result<()> {
    let mut layout = compute_layout(terminal, config)?;
    let mut title = String::new();

    // メインループ
    loop {
        if layout.geometry() != editor.geometry() {
            editor.handle(InputEvent::Resize(layout.geometry()), Instant::now());
        }

        update_title(terminal.backend_mut(), &editor, &mut title)?;

        let model = editor.render();
        // Synchronized Update: 描画のちらつきを防止
        queue!(terminal.backend_mut(), BeginSynchronizedUpdate)?;
        terminal.draw(|f| ui::draw(f, &model, &layout))?;
        queue!(terminal.backend_mut(), EndSynchronizedUpdate)?;
        terminal.backend_mut().flush()?;

        // エスケープシーケンス待ちの間だけタイムアウト付きで待つ
        let pending = matches!(editor.mode(), InputMode::EscapeSequencePending { .. });
        if !pending || event::poll(config.escape_timeout())? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    editor.handle(key_event(key), Instant::now());
                }
                Event::Mouse(mouse) if config.mouse => {
                    if let Some(event) = mouse_event(mouse, &layout) {
                        editor.handle(event, Instant::now());
                    }
                }
                Event::Resize(_, _) => {
                    layout = compute_layout(terminal, config)?;
                }
                _ => {}
            }
        } else {
            editor.tick(Instant::now());
        }

        if editor.should_quit() {
            break;
        }
    }

    Ok(())
}

/// 端末サイズから画面配置を計算
fn compute_layout(
    terminal: &Terminal<CrosstermBackend<io::Stdout>>,
    config: &Config,
) -> Result<ScreenLayout> {
    let size = terminal.size()?;
    let area = Rect::new(0, 0, size.width, size.height);
    Ok(ScreenLayout::compute(
        area,
        config.group_size,
        config.bytes_per_row,
    ))
}

/// crossterm のキーイベントを変換
fn key_event(key: KeyEvent) -> InputEvent {
    let mods = KeyMod {
        ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
        alt: key.modifiers.contains(KeyModifiers::ALT),
    };
    InputEvent::Key(key.code, mods)
}

/// 左クリックをペイン内座標に変換
fn mouse_event(mouse: MouseEvent, layout: &ScreenLayout) -> Option<InputEvent> {
    if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
        return None;
    }
    let (pane, x, y) = layout.hit_test(mouse.column, mouse.row)?;
    Some(InputEvent::Mouse { pane, x, y })
}

/// ウィンドウタイトルを更新（変化したときだけ）
fn update_title(
    backend: &mut CrosstermBackend<io::Stdout>,
    editor: &Editor,
    current: &mut String,
) -> Result<()> {
    let title = format!(
        "hexed - {}{}",
        editor.filename().unwrap_or("[No Name]"),
        if editor.is_modified() { " [+]" } else { "" }
    );
    if *current != title {
        execute!(backend, SetTitle(&title))?;
        *current = title;
    }
    Ok(())
}
