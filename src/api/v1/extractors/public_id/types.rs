/**
 * Responsibility
 *  - リソースごとの「意味付きID型」を宣言する
 *
 * 置くもの
 *  - ShopTag などのタグ型と alias
 *
 * 置かないもの
 *  - decode ロジック / extractor 実装
 */
use super::core::PublicId;

// shops
pub enum ShopTag {}
pub type PublicShopId = PublicId<ShopTag>;
