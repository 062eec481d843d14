mod codec_tests;
mod tests;
