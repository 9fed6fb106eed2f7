mod common;

use qaqf_content_core::browser::launch_headless_browser;
use qaqf_content_core::infrastructure::{ChromePdfRenderer, PdfRenderer};
use qaqf_content_core::services::ExportWriter;
use qaqf_content_core::utils::logging;

#[tokio::test]
#[ignore] // 需要本机安装 Chrome：cargo test -- --ignored
async fn test_render_pdf_with_headless_chrome() {
    // 初始化日志
    logging::init(true);

    let (_browser, page) = launch_headless_browser()
        .await
        .expect("启动无头浏览器失败");
    let renderer = ChromePdfRenderer::new(page);

    let record = common::record(9, "Intro to QAQF");
    let bytes = renderer.render(&record).await.expect("生成 PDF 失败");
    assert!(bytes.starts_with(b"%PDF"), "输出应为 PDF");

    let dir = tempfile::tempdir().unwrap();
    let path = ExportWriter::new(dir.path())
        .write_pdf(&record, &bytes)
        .await
        .expect("写入 PDF 失败");
    assert!(path.ends_with("Intro_to_QAQF_9.pdf"));
}
